//! Shared context for pipeline stages.

use pulldown_cmark::Options;

use crate::render::highlight::SyntaxHighlighter;

/// Read-only resources available to every stage of a single render.
pub struct StageContext<'a> {
    /// Syntax highlighter for code blocks
    pub highlighter: &'a SyntaxHighlighter,

    /// Parser extensions, decided by whether the gfm stage is enabled
    pub parse_options: Options,

    /// Whether the emoji stage runs later in this pipeline.
    ///
    /// The toc stage runs before emoji substitution but has to produce the
    /// same anchors the slug stage will derive from the substituted text.
    pub emoji: bool,
}
