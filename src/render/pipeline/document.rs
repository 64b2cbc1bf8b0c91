//! Document trees flowing through the pipeline.

use pulldown_cmark::Event;

/// The document being rendered, in whichever shape the last stage left it.
///
/// 1. Initially: `Source` (raw Markdown text)
/// 2. After parse: `Markdown` (event stream)
/// 3. After tree-convert: `Html` (block nodes with headings and code blocks
///    broken out for the slug and highlight stages)
/// 4. After stringify: `Output`
#[derive(Debug, Clone)]
pub enum Tree {
    Source(String),
    Markdown(Vec<Event<'static>>),
    Html(Vec<HtmlNode>),
    Output(String),
}

impl Tree {
    /// Short name of the tree shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Tree::Source(_) => "markdown source",
            Tree::Markdown(_) => "markdown tree",
            Tree::Html(_) => "html tree",
            Tree::Output(_) => "html output",
        }
    }
}

/// A node of the HTML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    /// A heading with its inline content.
    Heading {
        level: u8,
        id: Option<String>,
        classes: Vec<String>,
        attrs: Vec<(String, Option<String>)>,
        /// Plain text of the heading, used for slugs
        text: String,
        content: Vec<Event<'static>>,
    },
    /// A fenced or indented code block.
    CodeBlock {
        language: Option<String>,
        code: String,
        /// Highlighted markup, once the highlight stage has run
        highlighted: Option<String>,
    },
    /// Any other run of content, rendered as-is.
    Fragment(Vec<Event<'static>>),
}
