//! Heading and URL slugs.

use std::collections::HashMap;

/// Github-slugger compatible slug generator.
///
/// Repeated headings get `-1`, `-2`, ... appended so every id in a document
/// is unique. A fresh `Slugger` is used per rendered document.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique slug for the given heading text.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut slug = base.clone();

        if self.counts.contains_key(&slug) {
            let mut count = self.counts[&base];
            loop {
                count += 1;
                slug = format!("{}-{}", base, count);
                if !self.counts.contains_key(&slug) {
                    break;
                }
            }
            self.counts.insert(base, count);
        }

        self.counts.insert(slug.clone(), 0);
        slug
    }
}

/// Slugify text the way github-slugger does.
///
/// Lowercases, drops everything that is not alphanumeric, `-` or `_`, and
/// turns each space into a hyphen. Hyphens are neither collapsed nor trimmed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            slug.push(ch.to_ascii_lowercase());
        } else if !ch.is_ascii() && (ch.is_alphanumeric() || is_combining_mark(ch)) {
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' {
            slug.push('-');
        }
    }

    slug
}

/// Slug for a URL path segment (tag pages, post pages).
///
/// Unlike [`slugify`] this collapses runs of separators and trims them, so
/// `"  Rust & Go "` becomes `"rust-go"`.
pub fn url_slug(text: &str) -> String {
    slugify(&text.trim().replace(['_', '\t'], " "))
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Unicode combining marks that must survive slugging (diacritics, virama, nukta).
fn is_combining_mark(ch: char) -> bool {
    matches!(
        ch as u32,
        0x0300..=0x036F
            | 0x0591..=0x05C7
            | 0x0610..=0x061A
            | 0x064B..=0x065F
            | 0x0670
            | 0x0900..=0x0903
            | 0x093A..=0x094F
            | 0x0951..=0x0957
            | 0x0962..=0x0963
            | 0x0E31..=0x0E3A
            | 0x0E47..=0x0E4E
            | 0x1AB0..=0x1AFF
            | 0x1DC0..=0x1DFF
            | 0x3099..=0x309A
            | 0xFE20..=0xFE2F
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("TypeScript & JSX"), "typescript--jsx");
        assert_eq!(slugify("🚀 Getting Started"), "-getting-started");
        assert_eq!(slugify("Héllo Wörld"), "héllo-wörld");
    }

    #[test]
    fn test_slugger_deduplicates() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Title"), "title");
        assert_eq!(slugger.slug("Title"), "title-1");
        assert_eq!(slugger.slug("Title"), "title-2");
        assert_eq!(slugger.slug("Other"), "other");
    }

    #[test]
    fn test_slugger_avoids_existing_suffix() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Title 1"), "title-1");
        assert_eq!(slugger.slug("Title"), "title");
        assert_eq!(slugger.slug("Title"), "title-2");
    }

    #[test]
    fn test_url_slug() {
        assert_eq!(url_slug("  Rust & Go "), "rust-go");
        assert_eq!(url_slug("whale"), "whale");
        assert_eq!(url_slug("machine_learning"), "machine-learning");
    }
}
