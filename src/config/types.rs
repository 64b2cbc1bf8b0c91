//! Configuration type definitions.
//!
//! These types are pure data; loading lives in `load`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::RenderOptions;

/// The contents of `scribe.yaml`.
///
/// ```yaml
/// site:
///   title: My Blog
///   url: https://blog.example.com
/// paths:
///   content: content
///   templates: templates
///   media: content/images
///   output: dist
/// render:
///   toc: true
///   emoji: false
/// highlight:
///   theme: github-dark
/// ```
///
/// Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub paths: PathsConfig,
    pub render: RenderOptions,
    pub highlight: HighlightConfig,

    /// Directory relative paths resolve against (the config file's directory)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Resolve a configured path against the config file's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    pub fn content_dir(&self) -> PathBuf {
        self.resolve(&self.paths.content)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve(&self.paths.templates)
    }

    pub fn media_dir(&self) -> PathBuf {
        self.resolve(&self.paths.media)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output)
    }
}

// =============================================================================
// Site configuration
// =============================================================================

/// Site-wide values passed to every template as `site`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: None,
            url: None,
        }
    }
}

// =============================================================================
// Paths
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Markdown posts
    pub content: PathBuf,
    /// `post.html`, `tag.html` and `home.html`
    pub templates: PathBuf,
    /// Media copied to `{output}/images`
    pub media: PathBuf,
    /// Generated site
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            templates: PathBuf::from("templates"),
            media: PathBuf::from("content/images"),
            output: PathBuf::from("dist"),
        }
    }
}

// =============================================================================
// Syntax highlighting
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Any theme name autumnus knows
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "github-dark".to_string(),
        }
    }
}
