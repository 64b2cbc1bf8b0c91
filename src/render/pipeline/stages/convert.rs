//! Markdown tree to HTML tree conversion.

use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};

use super::expect_markdown;
use crate::render::pipeline::{HtmlNode, RenderError, Stage, Tree};

pub fn run(tree: Tree) -> Result<Tree, RenderError> {
    let events = expect_markdown(Stage::TreeConvert, tree)?;

    let mut nodes = Vec::new();
    let mut fragment: Vec<Event<'static>> = Vec::new();
    let mut events = events.into_iter();

    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                flush(&mut fragment, &mut nodes);

                let mut text = String::new();
                let mut content = Vec::new();
                loop {
                    match events.next() {
                        Some(Event::End(TagEnd::Heading(_))) => break,
                        Some(event) => {
                            if let Event::Text(t) | Event::Code(t) = &event {
                                text.push_str(t);
                            }
                            content.push(event);
                        }
                        None => {
                            return Err(RenderError::stage(
                                Stage::TreeConvert,
                                "heading is never closed",
                            ));
                        }
                    }
                }

                nodes.push(HtmlNode::Heading {
                    level: level as u8,
                    id: id.map(|id| id.to_string()),
                    classes: classes.iter().map(|c| c.to_string()).collect(),
                    attrs: attrs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.as_ref().map(|v| v.to_string())))
                        .collect(),
                    text,
                    content,
                });
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                flush(&mut fragment, &mut nodes);

                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                };

                let mut code = String::new();
                loop {
                    match events.next() {
                        Some(Event::End(TagEnd::CodeBlock)) => break,
                        Some(Event::Text(text)) => code.push_str(&text),
                        Some(other) => {
                            return Err(RenderError::stage(
                                Stage::TreeConvert,
                                format!("unexpected {:?} inside code block", other),
                            ));
                        }
                        None => {
                            return Err(RenderError::stage(
                                Stage::TreeConvert,
                                "code block is never closed",
                            ));
                        }
                    }
                }

                nodes.push(HtmlNode::CodeBlock {
                    language,
                    code,
                    highlighted: None,
                });
            }
            other => fragment.push(other),
        }
    }

    flush(&mut fragment, &mut nodes);
    Ok(Tree::Html(nodes))
}

fn flush(fragment: &mut Vec<Event<'static>>, nodes: &mut Vec<HtmlNode>) {
    if !fragment.is_empty() {
        nodes.push(HtmlNode::Fragment(std::mem::take(fragment)));
    }
}
