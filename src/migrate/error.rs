use std::path::PathBuf;

/// Errors that abort a migration.
#[derive(thiserror::Error, Debug)]
pub enum MigrationError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("post {id} has an unusable slug: '{slug}'")]
    InvalidSlug { id: u64, slug: String },

    #[error("media {id} has an unusable MIME type: '{mime_type}'")]
    InvalidMedia { id: u64, mime_type: String },

    #[error("failed to convert the body of '{slug}' to markdown: {message}")]
    Convert { slug: String, message: String },

    #[error("failed to write the header of '{slug}': {source}")]
    Header {
        slug: String,
        source: serde_yaml::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failure reported by a non-HTTP [`WordPressApi`](super::WordPressApi) implementation.
    #[error("WordPress API error: {0}")]
    Api(String),
}
