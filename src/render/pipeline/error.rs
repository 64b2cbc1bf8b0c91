//! Pipeline error types.

use super::Stage;
use super::document::Tree;

/// Errors that can occur while rendering a document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("failed to render markdown: stage '{stage}' failed: {message}")]
    Stage { stage: &'static str, message: String },

    #[error("failed to render markdown: stage '{stage}' expected {expected}, got {found}")]
    TreeShape {
        stage: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl RenderError {
    /// Create a stage-specific error.
    pub fn stage(stage: Stage, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.name(),
            message: message.into(),
        }
    }

    /// A stage was handed a tree it cannot work on.
    pub fn shape(stage: Stage, expected: &'static str, found: &Tree) -> Self {
        Self::TreeShape {
            stage: stage.name(),
            expected,
            found: found.kind(),
        }
    }
}
