//! Content module - front-matter, post loading and indexing

mod frontmatter;
pub mod index;
pub mod loader;
mod post;

pub use frontmatter::{is_sortable_date, FrontMatter};
pub use index::{normalize_label, sort_by_date_desc, ContentIndex};
pub use loader::ContentLoader;
pub use post::{Post, PostSummary, RenderedPost, RouteParam, RouteParams};
