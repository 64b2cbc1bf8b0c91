//! Configuration loading from files.

use std::collections::HashMap;
use std::path::Path;

use config::{Environment, File, FileFormat};

use super::{Config, ConfigError};

/// Looked up in the working directory when no config file is given.
pub const DEFAULT_CONFIG_FILE: &str = "scribe.yaml";

/// Prefix of environment overrides: `SCRIBE__RENDER__TOC=false`.
const ENV_PREFIX: &str = "SCRIBE";

impl Config {
    /// Load the config from the command line argument, defaulting to `scribe.yaml`
    pub async fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file).await
    }

    /// Load the config from a file path, applying environment overrides.
    pub async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None).await
    }

    /// Load with an explicit environment instead of the process one.
    async fn load_with_env(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        let mut config = config::Config::builder()
            .add_source(File::new(path_str, FileFormat::Yaml))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize::<Config>()?;

        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Serialize to YAML, as written by `scribe init`.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
