//! Markdown parsing stage.

use pulldown_cmark::{Event, Parser, TextMergeStream};

use crate::render::pipeline::{RenderError, Stage, StageContext, Tree};

/// Deepest element nesting a document may have.
///
/// Later stages walk the tree recursively; pathological inputs such as a few
/// hundred nested block quotes are rejected here instead.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parse raw Markdown into an owned event stream.
pub fn run(tree: Tree, ctx: &StageContext) -> Result<Tree, RenderError> {
    let source = match tree {
        Tree::Source(source) => source,
        other => return Err(RenderError::shape(Stage::Parse, "markdown source", &other)),
    };

    let parser = TextMergeStream::new(Parser::new_ext(&source, ctx.parse_options));

    let mut depth = 0usize;
    let mut events = Vec::new();
    for event in parser {
        match event {
            Event::Start(_) => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(RenderError::stage(
                        Stage::Parse,
                        format!("document nests deeper than {} levels", MAX_NESTING_DEPTH),
                    ));
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        events.push(event.into_static());
    }

    Ok(Tree::Markdown(events))
}
