use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::document::RawDocument;
use super::index::IndexError;
use super::post::ValidationError;

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("template '{name}' not found at {path}")]
    TemplateNotFound { name: String, path: PathBuf },

    #[error("invalid post '{id}': {source}")]
    InvalidPost {
        id: String,
        source: ValidationError,
    },

    #[error("posts '{first}' and '{second}' share the slug '{slug}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("tag index error: {0}")]
    Index(#[from] IndexError),
}

// =============================================================================
// Provider contract
// =============================================================================

/// Where posts and templates come from.
///
/// Lookups that miss return `Ok(None)`; errors are reserved for I/O failures.
pub trait ContentProvider: Send + Sync {
    /// Every post document, in a stable order.
    fn list_posts(&self) -> impl Future<Output = Result<Vec<RawDocument>, ContentError>> + Send;

    /// A single post document by identifier.
    fn get_post(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RawDocument>, ContentError>> + Send;

    /// The source of a named template.
    fn get_template(&self, name: &str) -> impl Future<Output = Result<String, ContentError>> + Send;
}

// =============================================================================
// File system provider
// =============================================================================

const POST_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Reads posts from a content directory and templates from a template directory.
///
/// Post identifiers are file stems: `content/whale-song.md` is `whale-song`.
/// Only the top level of the content directory holds posts; subdirectories
/// such as `images/` are ignored, as are hidden files.
#[derive(Debug, Clone)]
pub struct FileProvider {
    content_dir: PathBuf,
    templates_dir: PathBuf,
}

impl FileProvider {
    pub fn new(content_dir: impl Into<PathBuf>, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            templates_dir: templates_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}

/// Whether `id` names a file directly inside a directory.
///
/// Anything that could climb out of it (separators, `..`, hidden names) is not.
fn is_plain_name(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\', '\0'])
        && !id.contains("..")
        && Path::new(id).components().count() == 1
}

fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| POST_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read a file, mapping "not found" to `None`.
async fn read_optional(path: &Path) -> Result<Option<String>, ContentError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ContentError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

impl ContentProvider for FileProvider {
    async fn list_posts(&self) -> Result<Vec<RawDocument>, ContentError> {
        let read_dir_err = |source| ContentError::ReadDir {
            path: self.content_dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.content_dir)
            .await
            .map_err(read_dir_err)?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
            let file_name = entry.file_name();
            if file_name.to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type().await.map_err(read_dir_err)?;
            if file_type.is_file() && is_post_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ContentError::ReadFile {
                    path: path.clone(),
                    source,
                })?;
            trace!(id = %id, path = %path.display(), "read post");
            documents.push(RawDocument::new(id, text).with_path(path));
        }

        debug!(
            count = documents.len(),
            dir = %self.content_dir.display(),
            "listed posts"
        );
        Ok(documents)
    }

    async fn get_post(&self, id: &str) -> Result<Option<RawDocument>, ContentError> {
        if !is_plain_name(id) {
            debug!(id, "rejected post id outside the content directory");
            return Ok(None);
        }

        for extension in POST_EXTENSIONS {
            let path = self.content_dir.join(format!("{}.{}", id, extension));
            if let Some(text) = read_optional(&path).await? {
                return Ok(Some(RawDocument::new(id, text).with_path(path)));
            }
        }

        Ok(None)
    }

    async fn get_template(&self, name: &str) -> Result<String, ContentError> {
        let path = self.templates_dir.join(format!("{}.html", name));
        if !is_plain_name(name) {
            return Err(ContentError::TemplateNotFound {
                name: name.to_string(),
                path,
            });
        }

        match read_optional(&path).await? {
            Some(source) => Ok(source),
            None => Err(ContentError::TemplateNotFound {
                name: name.to_string(),
                path,
            }),
        }
    }
}
