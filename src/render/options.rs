//! Render configuration.

use serde::{Deserialize, Serialize};

/// Optional stage toggles, as given by a caller or a config file.
///
/// Every flag left as `None` falls back to whatever the engine is already
/// configured with. YAML form:
///
/// ```yaml
/// render:
///   toc: false
///   highlight: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// GitHub flavored Markdown (tables, strikethrough, task lists, autolinks)
    pub gfm: Option<bool>,
    /// Table of contents under a "toc" / "table of contents" heading
    pub toc: Option<bool>,
    /// `:shortcode:` emoji substitution
    pub emoji: Option<bool>,
    /// Anchor ids on headings
    pub slug: Option<bool>,
    /// Syntax highlighting of fenced code blocks
    pub highlight: Option<bool>,
    /// OpenAI API key. Reserved; no stage reads it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gfm(mut self, enabled: bool) -> Self {
        self.gfm = Some(enabled);
        self
    }

    pub fn toc(mut self, enabled: bool) -> Self {
        self.toc = Some(enabled);
        self
    }

    pub fn emoji(mut self, enabled: bool) -> Self {
        self.emoji = Some(enabled);
        self
    }

    pub fn slug(mut self, enabled: bool) -> Self {
        self.slug = Some(enabled);
        self
    }

    pub fn highlight(mut self, enabled: bool) -> Self {
        self.highlight = Some(enabled);
        self
    }
}

/// Fully resolved stage toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub gfm: bool,
    pub toc: bool,
    pub emoji: bool,
    pub slug: bool,
    pub highlight: bool,
    pub openai: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            toc: true,
            emoji: true,
            slug: true,
            highlight: true,
            openai: None,
        }
    }
}

impl RenderConfig {
    /// Returns a copy with every flag set in `options` applied on top.
    pub fn merged(&self, options: &RenderOptions) -> Self {
        Self {
            gfm: options.gfm.unwrap_or(self.gfm),
            toc: options.toc.unwrap_or(self.toc),
            emoji: options.emoji.unwrap_or(self.emoji),
            slug: options.slug.unwrap_or(self.slug),
            highlight: options.highlight.unwrap_or(self.highlight),
            openai: options.openai.clone().or_else(|| self.openai.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let config = RenderConfig::default();
        assert!(config.gfm && config.toc && config.emoji && config.slug && config.highlight);
        assert_eq!(config.openai, None);
    }

    #[test]
    fn test_merge_only_touches_given_flags() {
        let base = RenderConfig::default().merged(&RenderOptions::new().emoji(false));
        let merged = base.merged(&RenderOptions::new().toc(false));

        assert!(!merged.toc);
        assert!(!merged.emoji);
        assert!(merged.gfm);
        assert!(merged.highlight);
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let options: RenderOptions = serde_yaml::from_str("toc: false\nopenai: sk-test\n").unwrap();
        assert_eq!(options.toc, Some(false));
        assert_eq!(options.gfm, None);
        assert_eq!(options.openai.as_deref(), Some("sk-test"));
    }
}
