//! Print a single post

use anyhow::{anyhow, Result};

use crate::content::{MarkdownRenderer, Post, PostStore};
use crate::helpers::format_date;
use crate::Blog;

/// Print one post, as markdown or as rendered HTML
pub fn run(blog: &Blog, slug: &str, excerpt_only: bool, html: bool) -> Result<()> {
    let report = blog.load_posts()?;
    let post = report
        .store
        .get(slug)
        .ok_or_else(|| anyhow!("No post with slug `{}`", slug))?;

    if html {
        let renderer = MarkdownRenderer::new(&blog.config.highlight);
        print!("{}", renderer.render_post(post, excerpt_only)?);
    } else {
        print!(
            "{}",
            render(&report.store, post, &blog.config.date_format, excerpt_only)
        );
    }
    Ok(())
}

/// Header block followed by the markdown body
pub fn render(store: &PostStore, post: &Post, date_format: &str, excerpt_only: bool) -> String {
    let mut out = format!(
        "{}\n{}\n",
        post.title,
        format_date(&post.date, date_format)
    );
    out.push_str(&format!("path: {}\n", post.path));
    if !post.categories.is_empty() {
        out.push_str(&format!("categories: {}\n", post.categories.join(", ")));
    }
    if !post.tags.is_empty() {
        out.push_str(&format!("tags: {}\n", post.tags.join(", ")));
    }
    if let Some(newer) = store.prev(post) {
        out.push_str(&format!("newer: {}\n", newer.slug));
    }
    if let Some(older) = store.next(post) {
        out.push_str(&format!("older: {}\n", older.slug));
    }
    out.push('\n');

    if excerpt_only {
        out.push_str(&post.excerpt);
    } else {
        out.push_str(&post.body);
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
