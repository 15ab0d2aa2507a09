//! quill-rs: content indexing and markdown rendering for statically generated blogs
//!
//! Posts are markdown files with YAML front matter. This crate indexes them
//! by category and tag, renders bodies to sanitized HTML on demand and
//! enumerates the routes a static site needs to pre-render.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod markdown;
pub mod query;
pub mod sitemap;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use error::ContentError;
pub use query::{Query, RouteKind};

/// A blog rooted at a directory
#[derive(Clone)]
pub struct Quill {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory holding the `.md` posts
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Quill {
    /// Open a blog directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        }
    }

    pub fn loader(&self) -> content::ContentLoader {
        content::ContentLoader::new(&self.source_dir, &self.config)
    }

    pub fn renderer(&self) -> markdown::MarkdownRenderer {
        markdown::MarkdownRenderer::from_config(&self.config)
    }

    pub fn query(&self) -> Query {
        Query::new(self.loader(), self.renderer())
    }

    pub fn sitemap(&self) -> sitemap::SitemapGenerator {
        sitemap::SitemapGenerator::new(self.config.clone())
    }

    /// Build every output file
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
