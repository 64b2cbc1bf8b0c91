//! Stage implementations.
//!
//! Markdown-tree stages (gfm, toc, emoji) rewrite the pulldown-cmark event
//! stream; HTML-tree stages (slug, highlight) rewrite [`HtmlNode`]s.

pub mod convert;
pub mod emoji;
pub mod gfm;
pub mod highlight;
pub mod parse;
pub mod slug;
pub mod stringify;
pub mod toc;

use pulldown_cmark::Event;

use super::{HtmlNode, RenderError, Stage, Tree};

/// Unwrap a Markdown event tree or fail with a shape error.
fn expect_markdown(stage: Stage, tree: Tree) -> Result<Vec<Event<'static>>, RenderError> {
    match tree {
        Tree::Markdown(events) => Ok(events),
        other => Err(RenderError::shape(stage, "markdown tree", &other)),
    }
}

/// Unwrap an HTML tree or fail with a shape error.
fn expect_html(stage: Stage, tree: Tree) -> Result<Vec<HtmlNode>, RenderError> {
    match tree {
        Tree::Html(nodes) => Ok(nodes),
        other => Err(RenderError::shape(stage, "html tree", &other)),
    }
}
