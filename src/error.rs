//! Error types for loading posts

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure while splitting or deserializing a front-matter block
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter block opened with `{delimiter}` is never closed")]
    Unterminated { delimiter: &'static str },

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reason a single post could not be admitted into the store
#[derive(Error, Debug)]
pub enum PostError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error("missing `title` in front-matter")]
    MissingTitle,

    #[error("missing `date` in front-matter")]
    MissingDate,

    #[error("unrecognized date `{0}`")]
    InvalidDate(String),

    #[error("post body is empty")]
    EmptyBody,

    #[error("slug `{slug}` is also used by {}", display_paths(.others))]
    DuplicateSlug { slug: String, others: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A post error tied to the file it came from
#[derive(Debug)]
pub struct LoadError {
    /// Source path, relative to the posts directory
    pub path: PathBuf,
    pub error: PostError,
}

impl LoadError {
    pub fn new(path: impl Into<PathBuf>, error: impl Into<PostError>) -> Self {
        Self {
            path: path.into(),
            error: error.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file could not be read or its front-matter could not be parsed
    pub fn is_parse_error(&self) -> bool {
        matches!(self.error, PostError::Io(_) | PostError::FrontMatter(_))
    }

    pub fn is_duplicate_slug(&self) -> bool {
        matches!(self.error, PostError::DuplicateSlug { .. })
    }

    /// The file parsed but its contents are not a valid post
    pub fn is_validation_error(&self) -> bool {
        !self.is_parse_error()
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::new("2020-01-01-hello.md", PostError::MissingTitle);
        assert_eq!(
            err.to_string(),
            "2020-01-01-hello.md: missing `title` in front-matter"
        );
        assert!(err.is_validation_error());
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_duplicate_slug_lists_other_files() {
        let err = LoadError::new(
            "a/hello.md",
            PostError::DuplicateSlug {
                slug: "hello".to_string(),
                others: vec![PathBuf::from("b/hello.md"), PathBuf::from("c/hello.md")],
            },
        );
        assert!(err.is_duplicate_slug());
        assert_eq!(
            err.to_string(),
            "a/hello.md: slug `hello` is also used by b/hello.md, c/hello.md"
        );
    }

    #[test]
    fn test_unterminated_is_parse_error() {
        let err = LoadError::new(
            "broken.md",
            FrontMatterError::Unterminated { delimiter: "---" },
        );
        assert!(err.is_parse_error());
        assert!(err
            .to_string()
            .contains("front-matter block opened with `---` is never closed"));
    }
}
