//! HTML to Markdown conversion for migrated post bodies.
//!
//! Elements are rewritten in a single streaming pass: known elements are
//! replaced by their Markdown markup, unknown ones are unwrapped, and
//! `script`/`style` are dropped. Entities are decoded afterwards, except
//! that escaped `<` and `>` in prose stay escaped so they never turn into
//! live HTML.

use std::borrow::Cow;
use std::sync::LazyLock;

use lol_html::html_content::ContentType;
use lol_html::{ElementContentHandlers, RewriteStrSettings, Selector, element, rewrite_str};
use regex::{Captures, Regex};

/// Marks a `code` element that sits inside a `pre`.
const IN_PRE: &str = "data-md-pre";

/// Lines opening and closing a block quote, resolved into `> ` prefixes by `tidy`.
const QUOTE_OPEN: &str = "\u{E000}";
const QUOTE_CLOSE: &str = "\u{E001}";

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("entity pattern is valid")
});

static ENTITY_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("entity tail pattern is valid")
});

type Handler = (Cow<'static, Selector>, ElementContentHandlers<'static>);

/// Convert an HTML fragment to Markdown.
pub fn html_to_markdown(html: &str) -> Result<String, lol_html::errors::RewritingError> {
    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers(),
            ..RewriteStrSettings::new()
        },
    )?;

    Ok(tidy(&rewritten))
}

fn handlers() -> Vec<Handler> {
    let mut handlers = vec![
        element!("script, style, noscript", |el| {
            el.remove();
            Ok(())
        }),
        element!("pre code", |el| {
            el.set_attribute(IN_PRE, "")?;
            Ok(())
        }),
        element!("pre", |el| {
            el.before("\n\n```\n", ContentType::Html);
            el.after("\n```\n\n", ContentType::Html);
            el.remove_and_keep_content();
            Ok(())
        }),
        element!("code", |el| {
            if !el.has_attribute(IN_PRE) {
                wrap(el, "`", "`");
            }
            Ok(())
        }),
        element!("p, div, figure, section, article", |el| {
            wrap(el, "\n\n", "\n\n");
            Ok(())
        }),
        element!("br", |el| {
            el.replace("\\\n", ContentType::Html);
            Ok(())
        }),
        element!("hr", |el| {
            el.replace("\n\n---\n\n", ContentType::Html);
            Ok(())
        }),
        element!("strong, b", |el| {
            wrap(el, "**", "**");
            Ok(())
        }),
        element!("em, i", |el| {
            wrap(el, "*", "*");
            Ok(())
        }),
        element!("del, s", |el| {
            wrap(el, "~~", "~~");
            Ok(())
        }),
        element!("a[href]", |el| {
            let href = attribute(el, "href");
            wrap(el, "[", &format!("]({})", href));
            Ok(())
        }),
        element!("img", |el| {
            let src = attribute(el, "src");
            let alt = attribute(el, "alt");
            el.replace(&format!("![{}]({})", alt, src), ContentType::Html);
            Ok(())
        }),
        element!("ul, ol", |el| {
            wrap(el, "\n\n", "\n\n");
            Ok(())
        }),
        element!("ul > li", |el| {
            wrap(el, "\n- ", "\n");
            Ok(())
        }),
        element!("ol > li", |el| {
            wrap(el, "\n1. ", "\n");
            Ok(())
        }),
        element!("blockquote", |el| {
            wrap(
                el,
                &format!("\n\n{}\n", QUOTE_OPEN),
                &format!("\n{}\n\n", QUOTE_CLOSE),
            );
            Ok(())
        }),
    ];

    for level in 1..=6 {
        let selector = format!("h{}", level);
        let prefix = format!("\n\n{} ", "#".repeat(level));
        handlers.push(element!(selector, move |el| {
            wrap(el, &prefix, "\n\n");
            Ok(())
        }));
    }

    // Anything left is unwrapped
    handlers.push(element!("*", |el| {
        if !el.removed() {
            el.remove_and_keep_content();
        }
        Ok(())
    }));

    handlers
}

fn wrap(el: &mut lol_html::html_content::Element, before: &str, after: &str) {
    el.before(before, ContentType::Html);
    el.after(after, ContentType::Html);
    el.remove_and_keep_content();
}

/// An attribute value with its entities decoded.
fn attribute(el: &lol_html::html_content::Element, name: &str) -> String {
    let value = el.get_attribute(name).unwrap_or_default();
    html_escape::decode_html_entities(&value).into_owned()
}

/// Decode every entity; used for code, where Markdown shows text verbatim.
fn decode_code(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// Decode entities in prose, keeping `&lt;` and `&gt;` (and an `&amp;` that
/// would otherwise start a new entity) escaped.
fn decode_prose(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    ENTITY.replace_all(text, |caps: &Captures| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let end = caps.get(0).map_or(text.len(), |m| m.end());
        let decoded = html_escape::decode_html_entities(whole).into_owned();
        if decoded == "<" {
            "&lt;".to_string()
        } else if decoded == ">" {
            "&gt;".to_string()
        } else if decoded == "&" && ENTITY_TAIL.is_match(&text[end..]) {
            "&amp;".to_string()
        } else {
            decoded
        }
    })
}

/// Decode a line outside fenced code; backtick spans count as code.
fn decode_line(line: &str) -> String {
    line.split('`')
        .enumerate()
        .map(|(i, segment)| {
            if i % 2 == 1 {
                decode_code(segment)
            } else {
                decode_prose(segment)
            }
        })
        .collect::<Vec<_>>()
        .join("`")
}

/// Collapse runs of blank lines, trim lines outside fenced code, decode
/// entities and turn block quote markers into `> ` prefixes.
fn tidy(markdown: &str) -> String {
    // (line, is blank)
    let mut lines: Vec<(String, bool)> = Vec::new();
    let mut in_fence = false;
    let mut quote_depth = 0usize;

    let prefix = |depth: usize| "> ".repeat(depth);

    for line in markdown.lines() {
        let trimmed = line.trim();

        if !in_fence && (trimmed == QUOTE_OPEN || trimmed == QUOTE_CLOSE) {
            if trimmed == QUOTE_CLOSE {
                quote_depth = quote_depth.saturating_sub(1);
            }
            // A quote boundary is a blank line at the outer level
            let blank = prefix(quote_depth).trim_end().to_string();
            match lines.last_mut() {
                Some(last) if last.1 => last.0 = blank,
                Some(_) => lines.push((blank, true)),
                None => {}
            }
            if trimmed == QUOTE_OPEN {
                quote_depth += 1;
            }
            continue;
        }

        let line = line.replace(QUOTE_OPEN, "").replace(QUOTE_CLOSE, "");
        let is_fence = line.trim_start().starts_with("```");

        if in_fence && !is_fence {
            lines.push((format!("{}{}", prefix(quote_depth), decode_code(&line)), false));
            continue;
        }

        if is_fence {
            in_fence = !in_fence;
            lines.push((format!("{}{}", prefix(quote_depth), line.trim()), false));
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            if lines.last().is_none_or(|last| last.1) {
                continue;
            }
            lines.push((prefix(quote_depth).trim_end().to_string(), true));
            continue;
        }
        lines.push((format!("{}{}", prefix(quote_depth), decode_line(line)), false));
    }

    while lines.last().is_some_and(|last| last.1) {
        lines.pop();
    }

    let mut markdown = lines
        .into_iter()
        .map(|(line, _)| line)
        .collect::<Vec<_>>()
        .join("\n");
    markdown.push('\n');
    markdown
}
