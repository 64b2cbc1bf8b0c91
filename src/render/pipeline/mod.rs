//! Render pipeline.
//!
//! Markdown text is transformed through a fixed sequence of stages:
//! 1. Parse (Markdown to event tree)
//! 2. Gfm (tables, strikethrough, task lists, footnotes, literal autolinks)
//! 3. Toc (table of contents under a "toc" heading)
//! 4. Emoji (`:shortcode:` substitution)
//! 5. TreeConvert (Markdown tree to HTML tree)
//! 6. Slug (heading anchor ids)
//! 7. Highlight (fenced code blocks)
//! 8. Stringify (HTML tree to string)
//!
//! Only Gfm, Toc, Emoji, Slug and Highlight can be switched off. The order
//! never changes.

mod context;
mod document;
mod error;
mod stages;

pub use context::StageContext;
pub use document::{HtmlNode, Tree};
pub use error::RenderError;

use pulldown_cmark::Options;

use crate::render::highlight::SyntaxHighlighter;
use crate::render::options::RenderConfig;

/// A stage in the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Parse,
    Gfm,
    Toc,
    Emoji,
    TreeConvert,
    Slug,
    Highlight,
    Stringify,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 8] = [
        Stage::Parse,
        Stage::Gfm,
        Stage::Toc,
        Stage::Emoji,
        Stage::TreeConvert,
        Stage::Slug,
        Stage::Highlight,
        Stage::Stringify,
    ];

    /// Unique name for this stage (used in errors and logs).
    pub fn name(self) -> &'static str {
        match self {
            Stage::Parse => "parse",
            Stage::Gfm => "gfm",
            Stage::Toc => "toc",
            Stage::Emoji => "emoji",
            Stage::TreeConvert => "tree-convert",
            Stage::Slug => "slug",
            Stage::Highlight => "highlight",
            Stage::Stringify => "stringify",
        }
    }

    /// Whether the stage can be switched off.
    pub fn is_optional(self) -> bool {
        !matches!(self, Stage::Parse | Stage::TreeConvert | Stage::Stringify)
    }

    /// Whether the stage runs under the given configuration.
    pub fn is_enabled(self, config: &RenderConfig) -> bool {
        match self {
            Stage::Gfm => config.gfm,
            Stage::Toc => config.toc,
            Stage::Emoji => config.emoji,
            Stage::Slug => config.slug,
            Stage::Highlight => config.highlight,
            Stage::Parse | Stage::TreeConvert | Stage::Stringify => true,
        }
    }

    /// Transform the tree through this stage.
    fn process(self, tree: Tree, ctx: &StageContext) -> Result<Tree, RenderError> {
        match self {
            Stage::Parse => stages::parse::run(tree, ctx),
            Stage::Gfm => stages::gfm::run(tree),
            Stage::Toc => stages::toc::run(tree, ctx),
            Stage::Emoji => stages::emoji::run(tree),
            Stage::TreeConvert => stages::convert::run(tree),
            Stage::Slug => stages::slug::run(tree),
            Stage::Highlight => stages::highlight::run(tree, ctx),
            Stage::Stringify => stages::stringify::run(tree),
        }
    }
}

/// A compiled render pipeline: the enabled stages, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
    parse_options: Options,
}

impl Pipeline {
    /// Select the stages enabled by `config`.
    pub fn compile(config: &RenderConfig) -> Self {
        let stages: Vec<Stage> = Stage::ALL
            .into_iter()
            .filter(|stage| stage.is_enabled(config))
            .collect();

        // GFM block and inline syntax has to be recognized by the parser itself
        let parse_options = if stages.contains(&Stage::Gfm) {
            stages::gfm::parser_options()
        } else {
            Options::empty()
        };

        Self {
            stages,
            parse_options,
        }
    }

    /// Run the pipeline on a Markdown document.
    pub fn run(
        &self,
        markdown: &str,
        highlighter: &SyntaxHighlighter,
    ) -> Result<String, RenderError> {
        let ctx = StageContext {
            highlighter,
            parse_options: self.parse_options,
            emoji: self.stages.contains(&Stage::Emoji),
        };

        let mut tree = Tree::Source(markdown.to_string());
        for stage in &self.stages {
            tree = stage.process(tree, &ctx)?;
        }

        match tree {
            Tree::Output(html) => Ok(html),
            other => Err(RenderError::shape(Stage::Stringify, "html output", &other)),
        }
    }

    /// Get the stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Get the names of all stages in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::compile(&RenderConfig::default())
    }
}
