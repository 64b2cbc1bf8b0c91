//! Table of contents stage.
//!
//! Looks for the first top-level heading named `toc` or `table of contents`
//! (any case) and replaces the content of its section with a nested list of
//! links to every heading after that section. The section ends at the next
//! top-level heading of the same or a higher rank. When there is no such
//! heading, or nothing follows it, the document is left untouched.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

use super::emoji::replace_shortcodes;
use super::expect_markdown;
use crate::render::pipeline::{RenderError, Stage, StageContext, Tree};
use crate::render::slug::Slugger;

static TOC_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(toc|table of contents)$").expect("toc heading pattern is valid")
});

/// Where a heading sits in the event stream.
#[derive(Debug)]
struct HeadingSpan {
    /// Index of the `Start(Heading)` event
    start: usize,
    /// Index of the matching `End(Heading)` event
    end: usize,
    level: u8,
    /// Container nesting at the heading; 0 for top-level headings
    depth: usize,
    /// Plain text, inline code included
    text: String,
    /// Text the slug stage will see: shortcodes replaced outside inline code
    anchor_text: String,
}

pub fn run(tree: Tree, ctx: &StageContext) -> Result<Tree, RenderError> {
    let events = expect_markdown(Stage::Toc, tree)?;
    let headings = collect_headings(&events, ctx.emoji)?;

    let Some(position) = headings
        .iter()
        .position(|h| h.depth == 0 && TOC_HEADING.is_match(h.text.trim()))
    else {
        return Ok(Tree::Markdown(events));
    };
    let opening = &headings[position];

    let Some(closing) = headings[position + 1..]
        .iter()
        .position(|h| h.depth == 0 && h.level <= opening.level)
        .map(|offset| position + 1 + offset)
    else {
        return Ok(Tree::Markdown(events));
    };

    // Anchors have to match what the slug stage assigns later, so every
    // heading in the document takes part in de-duplication.
    let mut slugger = Slugger::new();
    let ids: Vec<String> = headings.iter().map(|h| slugger.slug(&h.anchor_text)).collect();

    // Headings nested in block quotes or lists still count for de-duplication
    // but are not listed.
    let entries: Vec<(&HeadingSpan, &str)> = headings[closing..]
        .iter()
        .zip(&ids[closing..])
        .filter(|(h, _)| h.depth == 0 && !h.text.trim().is_empty())
        .map(|(h, id)| (h, id.as_str()))
        .collect();
    if entries.is_empty() {
        return Ok(Tree::Markdown(events));
    }

    let list = build_list(&events, &entries);
    let section_end = headings[closing].start;

    let mut output = Vec::with_capacity(events.len() + list.len());
    let mut events = events;
    let rest = events.split_off(section_end);
    events.truncate(opening.end + 1);
    output.extend(events);
    output.extend(list);
    output.extend(rest);

    Ok(Tree::Markdown(output))
}

/// Find every heading with its plain text and nesting depth.
///
/// With `emoji`, shortcodes in text (but not in inline code) are replaced in
/// the anchor text, as the emoji stage does.
fn collect_headings(
    events: &[Event<'static>],
    emoji: bool,
) -> Result<Vec<HeadingSpan>, RenderError> {
    let mut headings = Vec::new();
    let mut current: Option<HeadingSpan> = None;
    let mut depth = 0usize;

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some(HeadingSpan {
                    start: index,
                    end: index,
                    level: *level as u8,
                    depth,
                    text: String::new(),
                    anchor_text: String::new(),
                });
                depth += 1;
            }
            Event::End(TagEnd::Heading(_)) => {
                depth = depth.saturating_sub(1);
                let mut heading = current.take().ok_or_else(|| {
                    RenderError::stage(Stage::Toc, "heading end without a matching start")
                })?;
                heading.end = index;
                headings.push(heading);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(text) => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(text);
                    if emoji {
                        heading.anchor_text.push_str(&replace_shortcodes(text));
                    } else {
                        heading.anchor_text.push_str(text);
                    }
                }
            }
            Event::Code(code) => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(code);
                    heading.anchor_text.push_str(code);
                }
            }
            _ => {}
        }
    }

    if current.is_some() {
        return Err(RenderError::stage(Stage::Toc, "unterminated heading"));
    }

    Ok(headings)
}

/// Build a tight, nested bullet list of links for the given headings.
fn build_list(events: &[Event<'static>], entries: &[(&HeadingSpan, &str)]) -> Vec<Event<'static>> {
    let min_level = entries.iter().map(|(h, _)| h.level).min().unwrap_or(1);

    let mut list = vec![Event::Start(Tag::List(None))];
    let mut depth = 1usize;
    let mut first = true;

    for (heading, id) in entries {
        let target = usize::from(heading.level - min_level) + 1;

        if first {
            while depth < target {
                list.push(Event::Start(Tag::Item));
                list.push(Event::Start(Tag::List(None)));
                depth += 1;
            }
            first = false;
        } else if target > depth {
            while depth < target {
                list.push(Event::Start(Tag::List(None)));
                depth += 1;
                if depth < target {
                    list.push(Event::Start(Tag::Item));
                }
            }
        } else {
            list.push(Event::End(TagEnd::Item));
            while depth > target {
                list.push(Event::End(TagEnd::List(false)));
                list.push(Event::End(TagEnd::Item));
                depth -= 1;
            }
        }

        list.push(Event::Start(Tag::Item));
        list.push(Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: format!("#{}", id).into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        list.extend(
            events[heading.start + 1..heading.end]
                .iter()
                .filter(|e| {
                    !matches!(
                        e,
                        Event::Start(Tag::Link { .. })
                            | Event::End(TagEnd::Link)
                            | Event::FootnoteReference(_)
                    )
                })
                .cloned(),
        );
        list.push(Event::End(TagEnd::Link));
    }

    list.push(Event::End(TagEnd::Item));
    while depth > 1 {
        list.push(Event::End(TagEnd::List(false)));
        list.push(Event::End(TagEnd::Item));
        depth -= 1;
    }
    list.push(Event::End(TagEnd::List(false)));

    list
}
