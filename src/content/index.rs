//! In-memory index of posts, categories and tags

use indexmap::IndexMap;

use super::{ContentLoader, Post};
use crate::error::Result;

/// Lookup key for a category or tag label
pub fn normalize_label(label: &str) -> String {
    label.to_lowercase()
}

/// Sort posts newest first by comparing date strings. Stable, so equal
/// dates keep their scan order.
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Every post plus category and tag indexes, rebuilt from scratch on each build.
///
/// Label maps are keyed by the lower-cased label and keep first-encounter
/// order. The category map always starts with the default category.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    posts: Vec<Post>,
    categories: IndexMap<String, Vec<String>>,
    tags: IndexMap<String, Vec<String>>,
}

impl ContentIndex {
    /// Scan the content directory once and index every post
    pub fn build(loader: &ContentLoader) -> Result<Self> {
        let posts = loader.load_all()?;
        let index = Self::from_posts(posts, loader.default_category());
        tracing::debug!(
            "Indexed {} posts, {} categories, {} tags",
            index.posts.len(),
            index.categories.len(),
            index.tags.len()
        );
        Ok(index)
    }

    pub fn from_posts(posts: Vec<Post>, default_category: &str) -> Self {
        let mut categories: IndexMap<String, Vec<String>> = IndexMap::new();
        categories.insert(normalize_label(default_category), Vec::new());
        let mut tags: IndexMap<String, Vec<String>> = IndexMap::new();

        for post in &posts {
            insert_labels(&mut categories, &post.categories, &post.id);
            insert_labels(&mut tags, &post.tags, &post.id);
        }

        Self {
            posts,
            categories,
            tags,
        }
    }

    /// Posts in scan order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn categories(&self) -> &IndexMap<String, Vec<String>> {
        &self.categories
    }

    pub fn tags(&self) -> &IndexMap<String, Vec<String>> {
        &self.tags
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// All posts, newest first
    pub fn sorted_by_date_desc(&self) -> Vec<Post> {
        let mut posts = self.posts.clone();
        sort_by_date_desc(&mut posts);
        posts
    }

    /// Posts in a category, newest first. Unknown labels yield nothing.
    pub fn posts_in_category(&self, label: &str) -> Vec<Post> {
        self.members(&self.categories, label)
    }

    /// Posts with a tag, newest first. Unknown labels yield nothing.
    pub fn posts_with_tag(&self, label: &str) -> Vec<Post> {
        self.members(&self.tags, label)
    }

    pub fn ids(&self) -> Vec<String> {
        self.posts.iter().map(|p| p.id.clone()).collect()
    }

    pub fn category_labels(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    pub fn tag_labels(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }

    fn members(&self, map: &IndexMap<String, Vec<String>>, label: &str) -> Vec<Post> {
        let Some(ids) = map.get(&normalize_label(label)) else {
            return Vec::new();
        };
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect();
        sort_by_date_desc(&mut posts);
        posts
    }
}

fn insert_labels(map: &mut IndexMap<String, Vec<String>>, labels: &[String], id: &str) {
    for label in labels {
        let ids = map.entry(normalize_label(label)).or_default();
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
}
