//! Heading slug stage: adds anchor ids to headings.

use super::expect_html;
use crate::render::pipeline::{HtmlNode, RenderError, Stage, Tree};
use crate::render::slug::Slugger;

pub fn run(tree: Tree) -> Result<Tree, RenderError> {
    let mut nodes = expect_html(Stage::Slug, tree)?;

    let mut slugger = Slugger::new();
    for node in &mut nodes {
        if let HtmlNode::Heading { id, text, .. } = node {
            // Headings with explicit ids are counted too, as in the toc stage
            let slug = slugger.slug(text);
            if id.is_none() {
                *id = Some(slug);
            }
        }
    }

    Ok(Tree::Html(nodes))
}
