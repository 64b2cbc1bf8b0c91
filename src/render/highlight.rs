use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language, themes};

/// A syntax highlighter using autumnus (tree-sitter based).
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    theme_name: String,
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with the given theme.
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme_name: theme_name.to_string(),
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Highlight code and return HTML with CSS classes.
    ///
    /// Returns `None` when the language is missing or not recognized, so the
    /// caller can fall back to a plain code block.
    pub fn highlight(&self, code: &str, language: &str) -> Option<String> {
        let language = language.trim();
        if language.is_empty() || matches!(language, "plaintext" | "text" | "txt") {
            return None;
        }

        // Language::guess handles language detection from name or extension
        let lang = Language::guess(language, code);
        if matches!(lang, Language::PlainText) {
            return None;
        }

        let formatter = HtmlLinkedBuilder::new().source(code).lang(lang).build().ok()?;
        let mut output: Vec<u8> = Vec::new();
        formatter.format(&mut output).ok()?;
        String::from_utf8(output).ok()
    }

    /// Generate CSS for the current theme.
    pub fn generate_css(&self) -> Option<String> {
        let theme = themes::get(&self.theme_name).ok()?;
        Some(theme.css(false)) // false = don't enable italic
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new("github-dark")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust() {
        let highlighter = SyntaxHighlighter::default();
        let result = highlighter.highlight("fn main() {}", "rust").unwrap();
        assert!(result.contains("<pre"));
        assert!(result.contains("</pre>"));
    }

    #[test]
    fn test_highlight_unknown_language() {
        let highlighter = SyntaxHighlighter::default();
        assert!(highlighter.highlight("some code", "unknown_lang_xyz").is_none());
    }

    #[test]
    fn test_highlight_without_language() {
        let highlighter = SyntaxHighlighter::default();
        assert!(highlighter.highlight("fn main() {}", "").is_none());
        assert!(highlighter.highlight("plain words", "text").is_none());
    }

    #[test]
    fn test_generate_css() {
        let highlighter = SyntaxHighlighter::new("dracula");
        let css = highlighter.generate_css().unwrap();
        assert!(!css.is_empty());
    }
}
