//! postroll: loads a directory of front-matter markdown posts into an
//! ordered, validated post store.
//!
//! Every file is parsed independently. Problems with individual files are
//! collected into a [`content::LoadReport`] instead of aborting the load.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use content::{LoadReport, Post, PostStore};
pub use error::{FrontMatterError, LoadError, PostError};

/// A blog rooted at a directory
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Directory holding the post files
    pub posts_dir: PathBuf,
}

impl Blog {
    /// Open a blog directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);
        let posts_dir = source_dir.join(&config.posts_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            posts_dir,
        })
    }

    /// Load every post, collecting per-file problems in the report
    pub fn load_posts(&self) -> Result<LoadReport> {
        Ok(content::ContentLoader::new(self)?.load_posts())
    }
}
