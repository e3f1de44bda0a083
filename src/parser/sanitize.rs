//! Text sanitization utilities for provider-supplied markup
//!
//! Some providers hand back the article body as HTML instead of a plain
//! summary. These helpers reduce such markup to readable plain text before
//! it is stored as a description.

use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled regex patterns for performance
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());

static MULTI_NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static EMBEDDED_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
});

static BLOCK_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|blockquote)\s*>").unwrap());

/// Reduce an HTML fragment to plain text
///
/// Steps:
/// 1. Drop comments and `<script>`/`<style>` blocks with their contents
/// 2. Turn paragraph-level closers and `<br>` into line breaks
/// 3. Remove every remaining tag
/// 4. Decode HTML entities
/// 5. Normalize whitespace, trim each line, collapse blank runs
///
/// # Examples
///
/// ```
/// use newsroom::parser::sanitize::strip_markup;
///
/// let html = "<p>Hello <strong>World</strong></p><p>Again &amp; again</p>";
/// assert_eq!(strip_markup(html), "Hello World\nAgain & again");
/// ```
pub fn strip_markup(html: &str) -> String {
    let mut result = COMMENT_REGEX.replace_all(html, "").into_owned();
    result = EMBEDDED_CODE_REGEX.replace_all(&result, "").into_owned();
    result = BLOCK_BREAK_REGEX.replace_all(&result, "\n").into_owned();
    result = strip_html_tags(&result);
    result = decode_html_entities(&result);
    result = normalize_whitespace(&result);
    result = trim_lines(&result);
    result = collapse_newlines(&result);

    result.trim().to_string()
}

/// Remove all tags, keeping the text between them
///
/// # Examples
///
/// ```
/// use newsroom::parser::sanitize::strip_html_tags;
///
/// let html = "<p>Hello <strong>World</strong></p>";
/// assert_eq!(strip_html_tags(html), "Hello World");
/// ```
pub fn strip_html_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").to_string()
}

/// Decode named and numeric HTML entities
pub fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Normalize runs of spaces, tabs and non-breaking spaces to a single space
///
/// Newlines are left alone; see [`collapse_newlines`].
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").to_string()
}

/// Trim whitespace from each line
pub fn trim_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse three or more consecutive newlines down to two
pub fn collapse_newlines(text: &str) -> String {
    MULTI_NEWLINE_REGEX.replace_all(text, "\n\n").to_string()
}

/// Check if text contains meaningful content
///
/// # Examples
///
/// ```
/// use newsroom::parser::sanitize::has_content;
///
/// assert!(has_content("Hello"));
/// assert!(!has_content("   \n\t  "));
/// ```
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Trimmed, non-empty string or `None`
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_tags() {
        let html = "<p>Hello <strong>World</strong></p>";
        assert_eq!(strip_html_tags(html), "Hello World");
    }

    #[test]
    fn test_strip_html_nested_tags() {
        let html = "<div><p>Para <span>with <em>nested</em> tags</span></p></div>";
        assert_eq!(strip_html_tags(html), "Para with nested tags");
    }

    #[test]
    fn test_strip_markup_drops_scripts_and_comments() {
        let html = "<p>Lead</p><!-- ad slot --><script>var x = '<b>';</script><style>p{}</style><p>Tail</p>";
        assert_eq!(strip_markup(html), "Lead\nTail");
    }

    #[test]
    fn test_strip_markup_keeps_paragraph_breaks() {
        let html = "<p>First paragraph.</p>\n\n<p>Second   paragraph.</p><br/>Third";
        let plain = strip_markup(html);
        assert_eq!(plain, "First paragraph.\n\nSecond paragraph.\n\nThird");
    }

    #[test]
    fn test_strip_markup_attributes_with_urls() {
        let html = r#"<a href="https://example.com/x?a=1&amp;b=2" class="link">Read more</a>"#;
        assert_eq!(strip_markup(html), "Read more");
    }

    #[test]
    fn test_strip_markup_plain_text_untouched() {
        assert_eq!(strip_markup("Just a summary."), "Just a summary.");
    }

    #[test]
    fn test_decode_html_entities() {
        let text = "&lt;div&gt;Hello &amp; World&#39;s&lt;/div&gt;";
        assert_eq!(decode_html_entities(text), "<div>Hello & World's</div>");
    }

    #[test]
    fn test_nbsp_normalization() {
        let plain = strip_markup("Hello&nbsp;&nbsp;World");
        assert_eq!(plain, "Hello World");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("Word1   \t  \t   Word2"), "Word1 Word2");
    }

    #[test]
    fn test_collapse_newlines() {
        assert_eq!(collapse_newlines("Para 1\n\n\n\n\nPara 2"), "Para 1\n\nPara 2");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Jane Doe ")), Some("Jane Doe".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_tags_only_has_no_content() {
        assert!(!has_content(&strip_markup("<p> </p><div></div>")));
    }
}
