//! Content loader - turns the posts directory into a post store

use anyhow::Result;
use chrono_tz::Tz;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::excerpt::split_excerpt;
use super::post::{dedup_ordered, expand_permalink};
use super::{derive_slug, parse_date_string, FrontMatter, Post, PostStore};
use crate::config::SiteConfig;
use crate::error::{LoadError, PostError};
use crate::Blog;

/// Raw text of one post file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    /// Path relative to the posts directory
    pub source: PathBuf,
    pub text: String,
}

impl RawPost {
    pub fn new(source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Outcome of loading every post file
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Posts that passed every check
    pub store: PostStore,
    /// Every problem found: read errors first, then parse and validation
    /// errors in source order, then duplicate slugs
    pub errors: Vec<LoadError>,
    /// Posts skipped because they are unpublished
    pub drafts: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// One-line summary for logs and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} posts loaded, {} errors, {} drafts skipped",
            self.store.len(),
            self.errors.len(),
            self.drafts
        )
    }
}

/// Turns raw post text into `Post` values using site settings
#[derive(Debug, Clone)]
pub struct PostParser {
    tz: Tz,
    marker: String,
    default_layout: String,
    permalink: String,
    root: String,
    render_drafts: bool,
}

impl PostParser {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            tz: config.tz()?,
            marker: config.excerpt_separator.clone(),
            default_layout: config.default_layout.clone(),
            permalink: config.permalink.clone(),
            root: config.root.clone(),
            render_drafts: config.render_drafts,
        })
    }

    /// Parse a single post. The same input always yields the same `Post`.
    pub fn parse(&self, raw: &RawPost) -> Result<Post, PostError> {
        let (fm, body) = FrontMatter::parse(&raw.text)?;

        let title = fm
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(PostError::MissingTitle)?;

        let date_str = fm.date.ok_or(PostError::MissingDate)?;
        let date = parse_date_string(&date_str, self.tz)
            .ok_or_else(|| PostError::InvalidDate(date_str.clone()))?;

        let updated = match fm.updated {
            Some(s) => Some(parse_date_string(&s, self.tz).ok_or(PostError::InvalidDate(s))?),
            None => None,
        };

        if body.trim().is_empty() {
            return Err(PostError::EmptyBody);
        }

        let slug = match fm.slug.as_deref().map(slug::slugify) {
            Some(s) if !s.is_empty() => s,
            _ => derive_slug(&raw.source, &title),
        };

        let categories = dedup_ordered(fm.categories);
        let path = expand_permalink(&self.permalink, &self.root, &date, &slug, &categories);
        let split = split_excerpt(body, &self.marker);

        Ok(Post {
            slug,
            title,
            date,
            updated,
            layout: fm.layout.unwrap_or_else(|| self.default_layout.clone()),
            comments: fm.comments.unwrap_or(true),
            published: fm.published.unwrap_or(true),
            categories,
            tags: dedup_ordered(fm.tags),
            body: body.to_string(),
            excerpt: split.excerpt.to_string(),
            more: split.more.map(str::to_string),
            source: raw.source.clone(),
            path,
            extra: fm.extra,
        })
    }

    /// Parse every source and build the store, collecting all errors
    pub fn load<I>(&self, sources: I) -> LoadReport
    where
        I: IntoIterator<Item = RawPost>,
    {
        let mut report = LoadReport::default();
        let mut posts = Vec::new();

        for raw in sources {
            match self.parse(&raw) {
                Ok(post) if !post.published && !self.render_drafts => {
                    tracing::debug!("Skipping unpublished post {:?}", raw.source);
                    report.drafts += 1;
                }
                Ok(post) => posts.push(post),
                Err(e) => report.errors.push(LoadError::new(raw.source, e)),
            }
        }

        let (store, duplicates) = PostStore::build(posts);
        report.store = store;
        report.errors.extend(duplicates);

        for error in &report.errors {
            tracing::warn!("{}", error);
        }

        report
    }
}

/// Loads posts from the site's posts directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    parser: PostParser,
}

impl<'a> ContentLoader<'a> {
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let parser = PostParser::new(&blog.config)?;
        Ok(Self { blog, parser })
    }

    /// Load all posts under the posts directory
    pub fn load_posts(&self) -> LoadReport {
        let posts_dir = &self.blog.posts_dir;
        if !posts_dir.exists() {
            tracing::info!("No posts directory at {:?}", posts_dir);
            return LoadReport::default();
        }

        let mut sources = Vec::new();
        let mut read_errors = Vec::new();

        for entry in WalkDir::new(posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let io = std::io::Error::from(e);
                    read_errors.push(LoadError::new(relative(&path, posts_dir), io));
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let source = relative(path, posts_dir);
            tracing::debug!("Reading {:?}", source);
            match fs::read_to_string(path) {
                Ok(text) => sources.push(RawPost { source, text }),
                Err(e) => read_errors.push(LoadError::new(source, e)),
            }
        }

        let mut report = self.parser.load(sources);
        for error in &read_errors {
            tracing::warn!("{}", error);
        }
        read_errors.append(&mut report.errors);
        report.errors = read_errors;

        tracing::info!("{}", report.summary());
        report
    }
}

fn relative(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
