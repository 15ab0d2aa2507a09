//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub url: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Routes
    pub post_dir: String,
    pub category_dir: String,
    pub tag_dir: String,

    // Writing
    /// Excerpt used when a post does not declare one (defaults to the site title)
    pub default_excerpt: Option<String>,
    pub default_category: String,
    #[serde(default)]
    pub toc: TocConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            url: "https://www.example.com".to_string(),

            source_dir: "posts".to_string(),
            public_dir: "public".to_string(),

            post_dir: "posts".to_string(),
            category_dir: "categories".to_string(),
            tag_dir: "tags".to_string(),

            default_excerpt: None,
            default_category: "Uncategorized".to_string(),
            toc: TocConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Excerpt for posts that do not declare one
    pub fn excerpt_fallback(&self) -> &str {
        self.default_excerpt.as_deref().unwrap_or(&self.title)
    }

    /// Site root URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Table-of-contents configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    pub ordered: bool,
    pub tight: bool,
    pub max_depth: u8,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            ordered: true,
            tight: true,
            max_depth: 6,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}
