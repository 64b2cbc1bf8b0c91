//! Syntax highlighting stage for fenced code blocks.

use super::expect_html;
use crate::render::pipeline::{HtmlNode, RenderError, Stage, StageContext, Tree};

pub fn run(tree: Tree, ctx: &StageContext) -> Result<Tree, RenderError> {
    let mut nodes = expect_html(Stage::Highlight, tree)?;

    for node in &mut nodes {
        if let HtmlNode::CodeBlock {
            language: Some(language),
            code,
            highlighted,
        } = node
        {
            // Unknown languages stay None and render as a plain block
            *highlighted = ctx.highlighter.highlight(code, language);
        }
    }

    Ok(Tree::Html(nodes))
}
