//! Excerpt splitting at a marker line

use super::lines_with_offsets;

/// Marker used when the site does not configure one
pub const DEFAULT_MARKER: &str = "<!-- more -->";

/// A body split at its first marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excerpt<'a> {
    /// Everything before the marker line, or the whole body
    pub excerpt: &'a str,
    /// Everything after the marker line; `None` when there is no marker
    pub more: Option<&'a str>,
}

impl<'a> Excerpt<'a> {
    pub fn has_more(&self) -> bool {
        self.more.is_some()
    }
}

/// Split `body` at the first line consisting only of `marker`.
///
/// Surrounding whitespace on the marker line is ignored. A marker that shares
/// its line with other text does not count, and neither does any marker line
/// after the first.
pub fn split_excerpt<'a>(body: &'a str, marker: &str) -> Excerpt<'a> {
    let marker = marker.trim();

    for (start, line) in lines_with_offsets(body) {
        if line.trim() == marker {
            return Excerpt {
                excerpt: &body[..start],
                more: Some(&body[start + line.len()..]),
            };
        }
    }

    Excerpt {
        excerpt: body,
        more: None,
    }
}
