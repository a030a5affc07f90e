//! Post model

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

lazy_static! {
    /// `2013-02-10-` prefix on Jekyll/Octopress style file names
    static ref DATE_PREFIX: Regex = Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}-").unwrap();
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier within the store
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<FixedOffset>,

    /// Last updated date
    pub updated: Option<DateTime<FixedOffset>>,

    /// Layout name from front-matter
    pub layout: String,

    /// Whether comments are enabled
    pub comments: bool,

    /// Whether the post is published
    pub published: bool,

    /// Post categories, first occurrence wins
    pub categories: Vec<String>,

    /// Post tags, first occurrence wins
    pub tags: Vec<String>,

    /// Markdown after the front-matter, marker line included
    pub body: String,

    /// Text before the excerpt marker, or the whole body
    pub excerpt: String,

    /// Text after the excerpt marker
    pub more: Option<String>,

    /// Source file path, relative to the posts directory
    pub source: PathBuf,

    /// URL path (with root)
    pub path: String,

    /// Custom front-matter fields
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Post {
    /// True when the body carries an excerpt marker
    pub fn has_more(&self) -> bool {
        self.more.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Derive a post slug from its file name, falling back to the title.
///
/// A leading `YYYY-MM-DD-` date prefix is dropped, so
/// `2013-02-10-verbal-math.markdown` becomes `verbal-math`.
pub fn derive_slug(source: &Path, title: &str) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let from_name = slug::slugify(DATE_PREFIX.replace(stem, ""));
    if !from_name.is_empty() {
        return from_name;
    }

    let from_title = slug::slugify(title);
    if from_title.is_empty() {
        "untitled".to_string()
    } else {
        from_title
    }
}

/// Remove repeated entries, keeping the first occurrence of each
pub(crate) fn dedup_ordered(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}

/// Build a URL path from a permalink pattern
pub(crate) fn expand_permalink(
    pattern: &str,
    root: &str,
    date: &DateTime<FixedOffset>,
    slug: &str,
    categories: &[String],
) -> String {
    let category = categories
        .first()
        .map(|c| slug::slugify(c))
        .unwrap_or_default();

    let expanded = pattern
        .replace(":year", &date.format("%Y").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
        .replace(":i_month", &date.format("%-m").to_string())
        .replace(":i_day", &date.format("%-d").to_string())
        .replace(":title", slug)
        .replace(":category", &category);

    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        expanded.trim_start_matches('/')
    )
}

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a front-matter date. Values without an offset are read in `tz`.
pub fn parse_date_string(s: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    // a wall-clock time skipped by a DST jump has no instant
    let local = tz.from_local_datetime(&naive).earliest()?;
    Some(local.with_timezone(&local.offset().fix()))
}
