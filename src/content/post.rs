use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use super::document::{RawDocument, parse_front_matter};
use super::index::normalize;

/// Marks the end of a post's summary.
pub const MORE_MARKER: &str = "<!-- more -->";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("post has no title")]
    MissingTitle,

    #[error("post '{title}' has no slug")]
    MissingSlug { title: String },

    #[error("post '{title}' has an invalid slug: {slug}")]
    InvalidSlug { title: String, slug: String },

    #[error("post '{title}' has an invalid date: {date}")]
    InvalidDate { title: String, date: String },
}

/// Metadata a post is built from, as read from its header.
#[derive(Debug, Clone, Default)]
pub struct PostMetadata {
    pub title: String,
    pub slug: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub date: Option<String>,
}

/// A parsed blog post.
///
/// Posts are immutable once built. Two posts are the same post when their
/// titles match after trimming and lowercasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    title: String,
    slug: String,
    tags: Vec<String>,
    categories: Vec<String>,
    date: Option<DateTime<Utc>>,
    content: String,
}

/// Build a post from a Markdown body and its metadata.
///
/// The title is stored as given; only comparisons normalize it.
pub fn parse_post(raw_text: &str, metadata: PostMetadata) -> Result<Post, ValidationError> {
    let PostMetadata {
        title,
        slug,
        tags,
        categories,
        date,
    } = metadata;

    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }

    let slug = slug.trim().to_string();
    if slug.is_empty() {
        return Err(ValidationError::MissingSlug { title });
    }
    // Slugs become output directory names
    if slug == "." || slug.contains("..") || slug.contains(['/', '\\']) {
        return Err(ValidationError::InvalidSlug { title, slug });
    }

    let date = match date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                return Err(ValidationError::InvalidDate {
                    title,
                    date: raw.to_string(),
                });
            }
        },
    };

    Ok(Post {
        title,
        slug,
        tags,
        categories,
        date,
        content: raw_text.to_string(),
    })
}

/// Parse the date formats found in post headers.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (WordPress), `YYYY-MM-DD HH:MM:SS`
/// and `YYYY-MM-DD`. Dates without an offset are taken as UTC.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

impl Post {
    /// Build a post from a provider document.
    ///
    /// The header supplies the metadata; a missing slug falls back to the
    /// document id.
    pub fn from_document(document: &RawDocument) -> Result<Self, ValidationError> {
        let parsed = parse_front_matter(&document.text);
        let header = parsed.header;

        let metadata = PostMetadata {
            title: header.title.unwrap_or_default(),
            slug: header
                .slug
                .filter(|slug| !slug.trim().is_empty())
                .unwrap_or_else(|| document.id.clone()),
            tags: header.tags,
            categories: header.categories,
            date: header.date,
        };

        parse_post(&parsed.body, metadata)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    /// The raw Markdown body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The body up to the `<!-- more -->` marker, or all of it.
    pub fn summary(&self) -> &str {
        match self.content.find(MORE_MARKER) {
            Some(pos) => self.content[..pos].trim_end(),
            None => &self.content,
        }
    }

    /// The identity key used for deduplication.
    pub fn normalized_title(&self) -> String {
        normalize(&self.title)
    }

    #[cfg(test)]
    pub(crate) fn unchecked(title: &str, slug: &str, tags: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            slug: slug.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            categories: Vec::new(),
            date: None,
            content: String::new(),
        }
    }

    /// Whether both posts have the same normalized title.
    pub fn is_same_post(&self, other: &Post) -> bool {
        self.normalized_title() == other.normalized_title()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn metadata(title: &str, slug: &str) -> PostMetadata {
        PostMetadata {
            title: title.to_string(),
            slug: slug.to_string(),
            ..PostMetadata::default()
        }
    }

    #[test]
    fn test_parse_post_keeps_title_casing() {
        let post = parse_post("body", metadata("  My Trip ", "my-trip")).unwrap();
        assert_eq!(post.title(), "  My Trip ");
        assert_eq!(post.normalized_title(), "my trip");
        assert_eq!(post.content(), "body");
    }

    #[test]
    fn test_blank_title_is_rejected() {
        assert_eq!(
            parse_post("body", metadata("   ", "slug")),
            Err(ValidationError::MissingTitle)
        );
        assert_eq!(
            parse_post("body", metadata("", "slug")),
            Err(ValidationError::MissingTitle)
        );
    }

    #[test]
    fn test_blank_slug_is_rejected() {
        let err = parse_post("body", metadata("Title", " ")).unwrap_err();
        assert!(matches!(err, ValidationError::MissingSlug { .. }));
    }

    #[test]
    fn test_path_like_slug_is_rejected() {
        for slug in ["../etc", "a/b", "a\\b", "."] {
            let err = parse_post("body", metadata("Title", slug)).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidSlug { .. }), "{}", slug);
        }
    }

    #[test]
    fn test_date_formats() {
        let cases = [
            "2021-04-02T10:30:00Z",
            "2021-04-02T12:30:00+02:00",
            "2021-04-02T10:30:00",
            "2021-04-02 10:30:00",
        ];
        for raw in cases {
            let post = parse_post(
                "",
                PostMetadata {
                    date: Some(raw.to_string()),
                    ..metadata("T", "t")
                },
            )
            .unwrap();
            let date = post.date().unwrap();
            assert_eq!((date.year(), date.month(), date.day()), (2021, 4, 2), "{}", raw);
            assert_eq!((date.hour(), date.minute()), (10, 30), "{}", raw);
        }

        let post = parse_post(
            "",
            PostMetadata {
                date: Some("2021-04-02".to_string()),
                ..metadata("T", "t")
            },
        )
        .unwrap();
        assert_eq!(post.date().unwrap().hour(), 0);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let err = parse_post(
            "",
            PostMetadata {
                date: Some("next tuesday".to_string()),
                ..metadata("T", "t")
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                title: "T".to_string(),
                date: "next tuesday".to_string()
            }
        );
    }

    #[test]
    fn test_missing_date_is_allowed() {
        let post = parse_post("", metadata("T", "t")).unwrap();
        assert_eq!(post.date(), None);
    }

    #[test]
    fn test_from_document_uses_header() {
        let doc = RawDocument::new(
            "tesla",
            "---\ntitle: Tesla Model 3\nslug: all-about-the-tesla-model-3\ntags: [tesla, cars]\n---\n\nFast.",
        );
        let post = Post::from_document(&doc).unwrap();
        assert_eq!(post.title(), "Tesla Model 3");
        assert_eq!(post.slug(), "all-about-the-tesla-model-3");
        assert_eq!(post.tags(), ["tesla", "cars"]);
        assert_eq!(post.content(), "Fast.");
    }

    #[test]
    fn test_from_document_falls_back_to_id_for_slug() {
        let doc = RawDocument::new("article-simple", "---\ntitle: Article Simple\n---\nHi");
        let post = Post::from_document(&doc).unwrap();
        assert_eq!(post.slug(), "article-simple");
    }

    #[test]
    fn test_from_document_without_title() {
        let doc = RawDocument::new("untitled", "just text");
        assert_eq!(Post::from_document(&doc), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn test_summary() {
        let post = parse_post("Intro\n\n<!-- more -->\n\nRest", metadata("T", "t")).unwrap();
        assert_eq!(post.summary(), "Intro");

        let post = parse_post("No marker", metadata("T", "t")).unwrap();
        assert_eq!(post.summary(), "No marker");
    }

    #[test]
    fn test_same_post_ignores_case_and_whitespace() {
        let a = parse_post("", metadata("My Trip", "a")).unwrap();
        let b = parse_post("", metadata("  my trip  ", "b")).unwrap();
        let c = parse_post("", metadata("My Other Trip", "c")).unwrap();
        assert!(a.is_same_post(&b));
        assert!(!a.is_same_post(&c));
    }
}
