use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// A post document as handed out by a [`ContentProvider`](super::ContentProvider),
/// before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Provider-specific identifier (the file stem for [`FileProvider`](super::FileProvider))
    pub id: String,
    /// Where the document was read from, if it came from disk
    pub path: Option<PathBuf>,
    /// Full text, front matter included
    pub text: String,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: None,
            text: text.into(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// The YAML header block of a post.
///
/// ```markdown
/// ---
/// title: Whale Song
/// slug: whale-song
/// tags: [whale, music]
/// categories: nature
/// date: 2021-04-02
/// ---
/// ```
///
/// `tags` and `categories` accept either a single string or a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostHeader {
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

/// Result of splitting front matter from a post.
#[derive(Debug)]
pub struct ParsedContent {
    /// The parsed header (empty if none found or unreadable)
    pub header: PostHeader,
    /// The Markdown body without the header block
    pub body: String,
}

/// Split a `---` delimited YAML header from the Markdown body.
///
/// Documents without a header, or with an unterminated one, are returned as
/// body only. A header that isn't valid YAML is logged and ignored.
pub fn parse_front_matter(text: &str) -> ParsedContent {
    let text = text.trim_start();

    if !text.starts_with("---") {
        return ParsedContent {
            header: PostHeader::default(),
            body: text.to_string(),
        };
    }

    let after_opening = &text[3..];
    let Some(closing_pos) = after_opening.find("\n---") else {
        return ParsedContent {
            header: PostHeader::default(),
            body: text.to_string(),
        };
    };

    let yaml = after_opening[..closing_pos].trim_start_matches(['\r', '\n']);

    let body_start = 3 + closing_pos + 4; // "---" + yaml + "\n---"
    let body = if body_start < text.len() {
        text[body_start..]
            .trim_start_matches(['\r', '\n'])
            .to_string()
    } else {
        String::new()
    };

    let header = if yaml.trim().is_empty() {
        PostHeader::default()
    } else {
        match serde_yaml::from_str(yaml) {
            Ok(header) => header,
            Err(e) => {
                warn!(error = %e, "failed to parse front matter");
                PostHeader::default()
            }
        }
    };

    ParsedContent { header, body }
}

/// Serialize a header back into a `---` delimited block.
pub fn render_front_matter(header: &PostHeader) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(header)?;
    Ok(format!("---\n{}---\n", yaml))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

/// Accept any YAML scalar (dates are often written unquoted).
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_yaml::Value::Null) => None,
        Some(serde_yaml::Value::String(s)) => Some(s),
        Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
        Some(serde_yaml::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected a date string, found {:?}",
                other
            )));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_front_matter_basic() {
        let text = r#"---
title: Whale Song
slug: whale-song
tags:
  - whale
  - music
date: 2021-04-02
---

# Hello World
"#;
        let parsed = parse_front_matter(text);
        assert_eq!(parsed.header.title.as_deref(), Some("Whale Song"));
        assert_eq!(parsed.header.slug.as_deref(), Some("whale-song"));
        assert_eq!(parsed.header.tags, vec!["whale", "music"]);
        assert_eq!(parsed.header.date.as_deref(), Some("2021-04-02"));
        assert_eq!(parsed.body.trim(), "# Hello World");
    }

    #[test]
    fn test_single_tag_and_category_strings() {
        let parsed = parse_front_matter("---\ntitle: T\ntags: ocean\ncategories: nature\n---\nbody");
        assert_eq!(parsed.header.tags, vec!["ocean"]);
        assert_eq!(parsed.header.categories, vec!["nature"]);
        assert_eq!(parsed.body, "body");
    }

    #[test]
    fn test_no_front_matter() {
        let parsed = parse_front_matter("# Just Markdown\n\nNo header here.");
        assert_eq!(parsed.header, PostHeader::default());
        assert!(parsed.body.starts_with("# Just Markdown"));
    }

    #[test]
    fn test_empty_front_matter() {
        let parsed = parse_front_matter("---\n---\n\n# Content");
        assert_eq!(parsed.header, PostHeader::default());
        assert!(parsed.body.starts_with("# Content"));
    }

    #[test]
    fn test_unterminated_front_matter_is_body() {
        let parsed = parse_front_matter("---\ntitle: Oops\n\nno closing fence");
        assert_eq!(parsed.header.title, None);
        assert!(parsed.body.contains("no closing fence"));
    }

    #[test]
    fn test_invalid_yaml_is_ignored() {
        let parsed = parse_front_matter("---\ntitle: [unclosed\n---\nbody");
        assert_eq!(parsed.header, PostHeader::default());
        assert_eq!(parsed.body, "body");
    }

    #[test]
    fn test_render_front_matter_parses_back() {
        let header = PostHeader {
            title: Some("Hello: World".to_string()),
            slug: Some("hello-world".to_string()),
            categories: vec!["News".to_string()],
            tags: vec!["a".to_string(), "b".to_string()],
            date: Some("2020-01-02T10:00:00".to_string()),
        };

        let block = render_front_matter(&header).unwrap();
        assert!(block.starts_with("---\n"));
        assert!(block.ends_with("---\n"));

        let parsed = parse_front_matter(&format!("{}\nbody", block));
        assert_eq!(parsed.header, header);
        assert_eq!(parsed.body, "body");
    }
}
