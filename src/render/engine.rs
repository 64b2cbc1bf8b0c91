//! The render engine.

use std::borrow::Cow;

use tracing::debug;

use super::highlight::SyntaxHighlighter;
use super::options::{RenderConfig, RenderOptions};
use super::pipeline::{Pipeline, RenderError};

/// Renders Markdown to HTML.
///
/// Holds a base configuration and the pipeline compiled from it. Per-call
/// overrides compile a throwaway pipeline and never touch the base.
/// Rendering takes `&self` only, so one engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct RenderEngine {
    config: RenderConfig,
    pipeline: Pipeline,
    highlighter: SyntaxHighlighter,
}

impl RenderEngine {
    /// Create an engine with every stage enabled except those switched off in `options`.
    pub fn new(options: &RenderOptions) -> Self {
        Self::with_highlighter(options, SyntaxHighlighter::default())
    }

    pub fn with_highlighter(options: &RenderOptions, highlighter: SyntaxHighlighter) -> Self {
        let config = RenderConfig::default().merged(options);
        let pipeline = Pipeline::compile(&config);
        Self {
            config,
            pipeline,
            highlighter,
        }
    }

    /// Change the default configuration.
    ///
    /// Flags not set in `options` keep their current value.
    pub fn configure(&mut self, options: &RenderOptions) {
        self.config = self.config.merged(options);
        self.pipeline = Pipeline::compile(&self.config);
        debug!(stages = ?self.pipeline.stage_names(), "render engine configured");
    }

    /// The current default configuration.
    pub fn options(&self) -> &RenderConfig {
        &self.config
    }

    /// The pipeline used when no overrides are given.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    /// Render Markdown to HTML.
    ///
    /// With `overrides`, the given flags apply to this call only.
    pub fn render(
        &self,
        markdown: &str,
        overrides: Option<&RenderOptions>,
    ) -> Result<String, RenderError> {
        let pipeline = match overrides {
            Some(options) => Cow::Owned(Pipeline::compile(&self.config.merged(options))),
            None => Cow::Borrowed(&self.pipeline),
        };

        pipeline.run(markdown, &self.highlighter)
    }
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new(&RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Trip Notes\n\n## Table of Contents\n\n## Day One\n\nWe saw a whale :whale:\n\n## Day Two\n\n```rust\nfn main() {}\n```\n";

    #[test]
    fn test_render_basic_markdown() {
        let engine = RenderEngine::default();
        let html = engine.render("# Hello\n\nWorld", None).unwrap();
        assert_eq!(html, "<h1 id=\"hello\">Hello</h1>\n<p>World</p>\n");
    }

    #[test]
    fn test_render_is_deterministic() {
        let engine = RenderEngine::default();
        let first = engine.render(DOC, None).unwrap();
        let second = engine.render(DOC, None).unwrap();
        assert_eq!(first, second);

        let overrides = RenderOptions::new().highlight(false);
        assert_eq!(
            engine.render(DOC, Some(&overrides)).unwrap(),
            engine.render(DOC, Some(&overrides)).unwrap()
        );
    }

    #[test]
    fn test_toc_toggle() {
        let engine = RenderEngine::default();

        let with_toc = engine.render(DOC, None).unwrap();
        assert!(with_toc.contains("<a href=\"#day-one\">Day One</a>"));
        assert!(with_toc.contains("<h2 id=\"day-one\">Day One</h2>"));

        let without_toc = engine
            .render(DOC, Some(&RenderOptions::new().toc(false)))
            .unwrap();
        assert!(!without_toc.contains("href=\"#day-one\""));
        assert!(without_toc.contains("Table of Contents"));
    }

    #[test]
    fn test_overrides_do_not_mutate_defaults() {
        let engine = RenderEngine::default();
        let before = engine.options().clone();

        engine
            .render(DOC, Some(&RenderOptions::new().toc(false).emoji(false)))
            .unwrap();

        assert_eq!(engine.options(), &before);
        assert!(engine.render(DOC, None).unwrap().contains("href=\"#day-one\""));
    }

    #[test]
    fn test_configure_keeps_unset_flags() {
        let mut engine = RenderEngine::new(&RenderOptions::new().emoji(false));
        engine.configure(&RenderOptions::new().toc(false));

        assert!(!engine.options().emoji);
        assert!(!engine.options().toc);
        assert!(engine.options().gfm);
        assert!(engine.options().slug);
        assert!(engine.options().highlight);
    }

    #[test]
    fn test_emoji_toggle() {
        let engine = RenderEngine::default();
        assert!(engine.render("hi :smile:", None).unwrap().contains('😄'));

        let html = engine
            .render("hi :smile:", Some(&RenderOptions::new().emoji(false)))
            .unwrap();
        assert!(html.contains(":smile:"));
    }

    #[test]
    fn test_gfm_toggle() {
        let engine = RenderEngine::default();
        let table = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~ https://example.com";

        let html = engine.render(table, None).unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<a href=\"https://example.com\">https://example.com</a>"));

        let html = engine
            .render(table, Some(&RenderOptions::new().gfm(false)))
            .unwrap();
        assert!(!html.contains("<table>"));
        assert!(!html.contains("<del>"));
        assert!(!html.contains("<a href"));
    }

    #[test]
    fn test_slug_toggle() {
        let engine = RenderEngine::new(&RenderOptions::new().slug(false));
        let html = engine.render("## Section", None).unwrap();
        assert_eq!(html, "<h2>Section</h2>\n");
    }

    #[test]
    fn test_highlight_toggle() {
        let engine = RenderEngine::default();
        let markdown = "```rust\nfn main() {}\n```\n";

        let plain = engine
            .render(markdown, Some(&RenderOptions::new().highlight(false)))
            .unwrap();
        assert_eq!(
            plain,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );

        let highlighted = engine.render(markdown, None).unwrap();
        assert!(highlighted.contains("<pre"));
        assert_ne!(highlighted, plain);
    }

    #[test]
    fn test_slug_without_toc_and_toc_without_slug() {
        let engine = RenderEngine::default();

        let html = engine
            .render(DOC, Some(&RenderOptions::new().toc(false)))
            .unwrap();
        assert!(html.contains("id=\"day-two\""));

        let html = engine
            .render(DOC, Some(&RenderOptions::new().slug(false)))
            .unwrap();
        assert!(html.contains("href=\"#day-two\""));
        assert!(!html.contains("id=\"day-two\""));
    }

    #[test]
    fn test_toc_links_match_heading_ids() {
        let engine = RenderEngine::default();
        let html = engine
            .render("## Toc\n\n## Use `:smile:` here\n\n## Say :smile:\n", None)
            .unwrap();

        assert!(html.contains("<a href=\"#use-smile-here\">"));
        assert!(html.contains("<h2 id=\"use-smile-here\">"));
        assert!(html.contains("<a href=\"#say-\">"));
        assert!(html.contains("<h2 id=\"say-\">"));
    }

    #[test]
    fn test_malformed_input_is_an_error_not_a_panic() {
        let engine = RenderEngine::default();
        let markdown = format!("{} deep", ">".repeat(500));

        let err = engine.render(&markdown, None).unwrap_err();
        assert!(err.to_string().starts_with("failed to render markdown"));

        // The engine is still usable afterwards
        assert!(engine.render("ok", None).is_ok());
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = std::sync::Arc::new(RenderEngine::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || engine.render(DOC, None).unwrap())
            })
            .collect();

        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    }
}
