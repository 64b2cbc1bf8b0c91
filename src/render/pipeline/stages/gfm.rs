//! GitHub flavored Markdown stage.
//!
//! Tables, strikethrough, task lists and footnotes are recognized by the
//! parser (see [`parser_options`]). This stage adds literal autolinks: bare
//! `https://…` and `www.…` URLs and email addresses in text become links.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Options, Tag, TagEnd};
use regex::Regex;

use super::expect_markdown;
use crate::render::pipeline::{RenderError, Stage, Tree};

static LITERAL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://|www\.)[^\s<>]+|[A-Za-z0-9._+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-_]+)+")
        .expect("literal url pattern is valid")
});

/// Parser extensions enabled alongside this stage.
pub fn parser_options() -> Options {
    Options::ENABLE_GFM
        | Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

pub fn run(tree: Tree) -> Result<Tree, RenderError> {
    let events = expect_markdown(Stage::Gfm, tree)?;

    let mut output = Vec::with_capacity(events.len());
    let mut in_link = 0usize;
    let mut in_code_block = false;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                in_link += 1;
                output.push(event);
            }
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                in_link = in_link.saturating_sub(1);
                output.push(event);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                output.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                output.push(event);
            }
            Event::Text(text) if in_link == 0 && !in_code_block => {
                autolink(&text, &mut output);
            }
            _ => output.push(event),
        }
    }

    Ok(Tree::Markdown(output))
}

/// Split `text` around literal URLs, emitting link events for each URL.
fn autolink(text: &str, output: &mut Vec<Event<'static>>) {
    let mut last = 0;

    for found in LITERAL_URL.find_iter(text) {
        let url = trim_url(found.as_str());
        if url.is_empty() || url == "www." {
            continue;
        }

        let start = found.start();
        let end = start + url.len();
        if start > last {
            output.push(Event::Text(text[last..start].to_string().into()));
        }

        let dest = if url.starts_with("www.") {
            format!("http://{}", url)
        } else if !url.contains("://") {
            format!("mailto:{}", url)
        } else {
            url.to_string()
        };
        output.push(Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: dest.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        output.push(Event::Text(url.to_string().into()));
        output.push(Event::End(TagEnd::Link));

        last = end;
    }

    if last < text.len() {
        output.push(Event::Text(text[last..].to_string().into()));
    }
}

/// Drop trailing punctuation that belongs to the sentence, not the URL.
///
/// A closing parenthesis is kept only when it balances an opening one
/// inside the URL.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let trim = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '"' | '\'' | '*' | '_' | '~' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !trim {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(text: &str) -> Vec<Event<'static>> {
        let mut output = Vec::new();
        autolink(text, &mut output);
        output
    }

    #[test]
    fn test_trim_url() {
        assert_eq!(trim_url("https://example.com."), "https://example.com");
        assert_eq!(trim_url("https://example.com/a_(b)"), "https://example.com/a_(b)");
        assert_eq!(trim_url("https://example.com)"), "https://example.com");
    }

    #[test]
    fn test_autolink_http() {
        let events = links("see https://example.com/docs, then stop");
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], Event::Text("see ".into()));
        assert!(matches!(
            &events[1],
            Event::Start(Tag::Link { dest_url, .. }) if dest_url.as_ref() == "https://example.com/docs"
        ));
        assert_eq!(events[4], Event::Text(", then stop".into()));
    }

    #[test]
    fn test_autolink_www_gets_scheme() {
        let events = links("www.rust-lang.org");
        assert!(matches!(
            &events[0],
            Event::Start(Tag::Link { dest_url, .. }) if dest_url.as_ref() == "http://www.rust-lang.org"
        ));
    }

    #[test]
    fn test_autolink_email() {
        let events = links("write to foo.bar@example.com.");
        assert_eq!(events.len(), 5);
        assert!(matches!(
            &events[1],
            Event::Start(Tag::Link { dest_url, .. }) if dest_url.as_ref() == "mailto:foo.bar@example.com"
        ));
        assert_eq!(events[2], Event::Text("foo.bar@example.com".into()));
        assert_eq!(events[4], Event::Text(".".into()));
    }

    #[test]
    fn test_url_with_user_is_not_an_email() {
        let events = links("https://user@example.com/x");
        assert!(matches!(
            &events[0],
            Event::Start(Tag::Link { dest_url, .. }) if dest_url.as_ref() == "https://user@example.com/x"
        ));
    }

    #[test]
    fn test_text_without_urls_is_unchanged() {
        assert_eq!(links("nothing here"), vec![Event::Text("nothing here".into())]);
    }
}
