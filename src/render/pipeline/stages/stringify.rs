//! Final stage: HTML tree to string.

use pulldown_cmark::{Event, html};

use super::expect_html;
use crate::render::pipeline::{HtmlNode, RenderError, Stage, Tree};

pub fn run(tree: Tree) -> Result<Tree, RenderError> {
    let nodes = expect_html(Stage::Stringify, tree)?;

    // Everything goes through a single writer so footnote numbering and
    // table state stay consistent across nodes
    let mut events: Vec<Event<'static>> = Vec::new();
    for node in nodes {
        match node {
            HtmlNode::Heading {
                level,
                id,
                classes,
                attrs,
                content,
                ..
            } => {
                events.push(Event::Html(open_heading(level, id.as_deref(), &classes, &attrs).into()));
                events.extend(content);
                events.push(Event::Html(format!("</h{}>\n", level).into()));
            }
            HtmlNode::CodeBlock {
                language,
                code,
                highlighted,
            } => {
                let block = match highlighted {
                    Some(html) => html,
                    None => plain_code_block(&code, language.as_deref()),
                };
                events.push(Event::Html(block.into()));
            }
            HtmlNode::Fragment(fragment) => events.extend(fragment),
        }
    }

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());
    Ok(Tree::Output(output))
}

fn open_heading(
    level: u8,
    id: Option<&str>,
    classes: &[String],
    attrs: &[(String, Option<String>)],
) -> String {
    let mut tag = format!("<h{}", level);
    if let Some(id) = id {
        tag.push_str(&format!(
            " id=\"{}\"",
            html_escape::encode_double_quoted_attribute(id)
        ));
    }
    if !classes.is_empty() {
        tag.push_str(&format!(
            " class=\"{}\"",
            html_escape::encode_double_quoted_attribute(&classes.join(" "))
        ));
    }
    for (key, value) in attrs {
        match value {
            Some(value) => tag.push_str(&format!(
                " {}=\"{}\"",
                key,
                html_escape::encode_double_quoted_attribute(value)
            )),
            None => tag.push_str(&format!(" {}", key)),
        }
    }
    tag.push('>');
    tag
}

/// Create a plain code block without highlighting.
fn plain_code_block(code: &str, language: Option<&str>) -> String {
    let escaped = html_escape::encode_text(code);
    match language {
        Some(language) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            html_escape::encode_double_quoted_attribute(language),
            escaped
        ),
        None => format!("<pre><code>{}</code></pre>\n", escaped),
    }
}
