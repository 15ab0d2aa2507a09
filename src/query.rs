//! Lookups used by the page layer to enumerate routes and fetch props
//!
//! Every call rebuilds the index from the content directory; nothing is
//! cached between calls.

use crate::content::{ContentIndex, ContentLoader, Post, PostSummary, RenderedPost, RouteParams};
use crate::error::Result;
use crate::markdown::MarkdownRenderer;

/// Listing type whose routes can be enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RouteKind {
    #[value(alias = "post")]
    Posts,
    #[value(alias = "category")]
    Categories,
    #[value(alias = "tag")]
    Tags,
}

/// Query layer over the content directory
pub struct Query {
    loader: ContentLoader,
    renderer: MarkdownRenderer,
}

impl Query {
    pub fn new(loader: ContentLoader, renderer: MarkdownRenderer) -> Self {
        Self { loader, renderer }
    }

    pub fn loader(&self) -> &ContentLoader {
        &self.loader
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Build a fresh index
    pub fn index(&self) -> Result<ContentIndex> {
        ContentIndex::build(&self.loader)
    }

    /// All posts, newest first by date string; ties keep scan order
    pub fn list_all_sorted_by_date_desc(&self) -> Result<Vec<Post>> {
        Ok(self.index()?.sorted_by_date_desc())
    }

    /// Posts in a category (case-insensitive), newest first
    pub fn list_by_category(&self, label: &str) -> Result<Vec<Post>> {
        Ok(self.index()?.posts_in_category(label))
    }

    /// Posts with a tag (case-insensitive), newest first
    pub fn list_by_tag(&self, label: &str) -> Result<Vec<Post>> {
        Ok(self.index()?.posts_with_tag(label))
    }

    /// One post with its rendered HTML
    pub fn get_one(&self, id: &str) -> Result<RenderedPost> {
        let post = self.loader.load(id)?;
        Ok(self.render(post))
    }

    /// Render an already loaded post
    pub fn render(&self, post: Post) -> RenderedPost {
        let html = self.renderer.render(&post.raw);
        post.into_rendered(html)
    }

    pub fn list_all_ids(&self) -> Result<Vec<String>> {
        Ok(self.index()?.ids())
    }

    /// Lower-cased category labels, the default category first
    pub fn list_all_category_labels(&self) -> Result<Vec<String>> {
        Ok(self.index()?.category_labels())
    }

    /// Lower-cased tag labels
    pub fn list_all_tag_labels(&self) -> Result<Vec<String>> {
        Ok(self.index()?.tag_labels())
    }

    /// Route params for every page of a listing type
    pub fn static_paths(&self, kind: RouteKind) -> Result<Vec<RouteParams>> {
        let ids = match kind {
            RouteKind::Posts => self.list_all_ids()?,
            RouteKind::Categories => self.list_all_category_labels()?,
            RouteKind::Tags => self.list_all_tag_labels()?,
        };
        Ok(ids.into_iter().map(RouteParams::new).collect())
    }
}

/// Listing props for a set of posts
pub fn summaries(posts: &[Post]) -> Vec<PostSummary> {
    posts.iter().map(Post::summary).collect()
}
