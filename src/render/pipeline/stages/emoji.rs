//! Emoji shortcode stage: `:smile:` becomes 😄.

use std::borrow::Cow;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Tag, TagEnd};
use regex::{Captures, Regex};

use super::expect_markdown;
use crate::render::pipeline::{RenderError, Stage, Tree};

static SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":([a-zA-Z0-9_+\-]+):").expect("shortcode pattern is valid")
});

pub fn run(tree: Tree) -> Result<Tree, RenderError> {
    let events = expect_markdown(Stage::Emoji, tree)?;

    let mut in_code_block = false;
    let events = events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                event
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                event
            }
            Event::Text(text) if !in_code_block => {
                let replaced = match replace_shortcodes(&text) {
                    Cow::Owned(replaced) => Some(replaced),
                    Cow::Borrowed(_) => None,
                };
                match replaced {
                    Some(replaced) => Event::Text(replaced.into()),
                    None => Event::Text(text),
                }
            }
            _ => event,
        })
        .collect();

    Ok(Tree::Markdown(events))
}

/// Replace every known `:shortcode:` in `text`. Unknown ones are left alone.
pub fn replace_shortcodes(text: &str) -> Cow<'_, str> {
    if !text.contains(':') {
        return Cow::Borrowed(text);
    }

    SHORTCODE.replace_all(text, |caps: &Captures| match emojis::get_by_shortcode(&caps[1]) {
        Some(emoji) => emoji.as_str().to_string(),
        None => caps[0].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_known_shortcode() {
        assert_eq!(replace_shortcodes("I am :smile:"), "I am 😄");
        assert_eq!(replace_shortcodes(":rocket: launch"), "🚀 launch");
    }

    #[test]
    fn test_unknown_shortcode_untouched() {
        assert_eq!(replace_shortcodes("a :not_an_emoji_xyz: b"), "a :not_an_emoji_xyz: b");
    }

    #[test]
    fn test_plain_colons_untouched() {
        assert!(matches!(replace_shortcodes("time 10:30"), Cow::Borrowed(_)));
        assert_eq!(replace_shortcodes("ratio 1:2:3"), "ratio 1:2:3");
    }

    #[test]
    fn test_code_blocks_are_skipped() {
        let events = vec![
            Event::Start(Tag::CodeBlock(pulldown_cmark::CodeBlockKind::Indented)),
            Event::Text(":smile:".into()),
            Event::End(TagEnd::CodeBlock),
            Event::Text(":smile:".into()),
        ];
        let Tree::Markdown(events) = run(Tree::Markdown(events)).unwrap() else {
            panic!("expected a markdown tree");
        };
        assert_eq!(events[1], Event::Text(":smile:".into()));
        assert_eq!(events[3], Event::Text("😄".into()));
    }
}
