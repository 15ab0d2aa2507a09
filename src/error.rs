//! Error types for content loading and lookup

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `ContentError`.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised while loading, indexing or looking up posts.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The id does not resolve to a post in the content directory.
    #[error("post not found: {id}")]
    NotFound { id: String },

    /// The front-matter block is not valid YAML or has a field of the wrong type.
    #[error("malformed front-matter in {path}: {source}")]
    MalformedMetadata {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An opening `---` was found without a closing delimiter.
    #[error("unterminated front-matter in {path}")]
    UnterminatedMetadata { path: PathBuf },

    /// A required front-matter field is absent.
    #[error("missing `{field}` in front-matter of {path}")]
    MissingMetadata { path: PathBuf, field: &'static str },

    /// File system I/O error.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn missing(path: impl Into<PathBuf>, field: &'static str) -> Self {
        Self::MissingMetadata {
            path: path.into(),
            field,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "no such route" rather than a broken build.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
