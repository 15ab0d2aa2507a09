//! Content loader - reads posts from the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter::is_sortable_date;
use super::{FrontMatter, Post};
use crate::config::SiteConfig;
use crate::error::{ContentError, Result};

/// Loads posts from one content directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    posts_dir: PathBuf,
    default_excerpt: String,
    default_category: String,
}

impl ContentLoader {
    /// Create a loader for `posts_dir`, taking fallbacks from `config`
    pub fn new(posts_dir: impl Into<PathBuf>, config: &SiteConfig) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            default_excerpt: config.excerpt_fallback().to_string(),
            default_category: config.default_category.clone(),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Ids of every post, in file-name order
    pub fn source_ids(&self) -> Result<Vec<String>> {
        if !self.posts_dir.is_dir() {
            tracing::warn!("Content directory {:?} does not exist", self.posts_dir);
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ContentError::io(&self.posts_dir, e.into()))?;
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(id.to_string());
                }
            }
        }

        Ok(ids)
    }

    /// Load a single post's metadata and raw body
    pub fn load(&self, id: &str) -> Result<Post> {
        let path = self
            .path_for(id)
            .filter(|p| p.is_file())
            .ok_or_else(|| ContentError::not_found(id))?;
        self.load_file(id, &path)
    }

    /// Load every post in scan order. The first failure aborts the scan.
    pub fn load_all(&self) -> Result<Vec<Post>> {
        let posts = self
            .source_ids()?
            .iter()
            .map(|id| self.load(id))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// Resolve an id to its source file, refusing ids that leave the directory
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let escapes = id.is_empty()
            || id == "."
            || id == ".."
            || id.contains(['/', '\\'])
            || id.contains('\0');
        if escapes {
            return None;
        }
        Some(self.posts_dir.join(format!("{}.md", id)))
    }

    fn load_file(&self, id: &str, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let (fm, body) = FrontMatter::parse(&content, path)?;

        let title = fm.title.ok_or_else(|| ContentError::missing(path, "title"))?;
        let date = fm.date.ok_or_else(|| ContentError::missing(path, "date"))?;
        if !is_sortable_date(&date) {
            tracing::warn!(
                "Date {:?} in {:?} is not zero-padded ISO-8601; posts may sort out of order",
                date,
                path
            );
        }

        let categories = match fm.categories {
            Some(categories) if !categories.is_empty() => categories,
            _ => vec![self.default_category.clone()],
        };

        tracing::debug!("Loaded post {:?} ({})", id, date);

        Ok(Post {
            id: id.to_string(),
            title,
            date,
            excerpt: fm.excerpt.unwrap_or_else(|| self.default_excerpt.clone()),
            categories,
            tags: fm.tags.unwrap_or_default(),
            raw: body.to_string(),
        })
    }
}

/// Check if a file is a markdown post
fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}
