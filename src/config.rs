//! Configuration loading and types for scribe.
//!
//! - Type definitions for `scribe.yaml` (`types`)
//! - Loading from the file plus `SCRIBE__*` environment overrides (`load`)

mod load;
mod types;

pub use load::DEFAULT_CONFIG_FILE;
pub use types::{Config, HighlightConfig, PathsConfig, SiteConfig};

use std::path::PathBuf;

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("config path is not valid UTF-8: {0}")]
    EncodePath(PathBuf),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}
