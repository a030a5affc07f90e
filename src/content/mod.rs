//! Content module - posts, front-matter, excerpts and the post store

pub mod excerpt;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod store;

pub use excerpt::Excerpt;
pub use frontmatter::FrontMatter;
pub use loader::{ContentLoader, LoadReport, PostParser, RawPost};
pub use markdown::MarkdownRenderer;
pub use post::{derive_slug, parse_date_string, Post};
pub use store::PostStore;

/// Iterate over the lines of `text` together with their byte offsets.
/// Each line keeps its terminator, so offsets and lengths tile the input.
pub(crate) fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}
