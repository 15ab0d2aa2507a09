//! Post models and the props shapes handed to the page layer

use serde::Serialize;

use super::index::normalize_label;

/// A post as read from the content directory: metadata plus raw markdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// File name without the `.md` extension
    pub id: String,

    pub title: String,

    /// Kept verbatim; ordering compares this string
    pub date: String,

    pub excerpt: String,

    /// Never empty; falls back to the default category
    pub categories: Vec<String>,

    pub tags: Vec<String>,

    /// Markdown body, rendered only on request
    #[serde(skip)]
    pub raw: String,
}

impl Post {
    /// Whether the post carries `label` as a category (case-insensitive)
    pub fn has_category(&self, label: &str) -> bool {
        let label = normalize_label(label);
        self.categories.iter().any(|c| normalize_label(c) == label)
    }

    /// Whether the post carries `label` as a tag (case-insensitive)
    pub fn has_tag(&self, label: &str) -> bool {
        let label = normalize_label(label);
        self.tags.iter().any(|t| normalize_label(t) == label)
    }

    /// Listing props for this post
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            date: self.date.clone(),
            id: self.id.clone(),
            categories: self.categories.clone(),
            title: self.title.clone(),
        }
    }

    /// Attach rendered HTML to this post
    pub fn into_rendered(self, content_html: String) -> RenderedPost {
        RenderedPost {
            id: self.id,
            title: self.title,
            excerpt: self.excerpt,
            date: self.date,
            content_html,
            categories: self.categories,
            tags: self.tags,
        }
    }
}

/// Props for one entry of a listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub date: String,
    pub id: String,
    pub categories: Vec<String>,
    pub title: String,
}

/// Props for a single post page. Produced on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub content_html: String,
    pub categories: Vec<String>,
    #[serde(skip)]
    pub tags: Vec<String>,
}

/// One static route to pre-render: `{ "params": { "id": ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    pub params: RouteParam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParam {
    pub id: String,
}

impl RouteParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            params: RouteParam { id: id.into() },
        }
    }
}
