//! Input cleaning for admin-submitted text.

use regex::Regex;
use std::sync::OnceLock;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Remove anything that looks like an HTML tag.
pub fn strip_tags(text: &str) -> String {
    tag_regex().replace_all(text, "").into_owned()
}

/// Clean a single-line field: tags removed, line breaks and runs of
/// whitespace collapsed to one space, ends trimmed.
pub fn sanitize_text(text: &str) -> String {
    let whitespace = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());
    let stripped = strip_tags(text);
    whitespace.replace_all(&stripped, " ").trim().to_string()
}

/// Clean a multi-line field: tags removed and ends trimmed, line breaks kept.
pub fn sanitize_textarea(text: &str) -> String {
    strip_tags(text).trim().to_string()
}

/// Make stored CSS safe to emit inside a `<style>` element.
pub fn sanitize_css_for_style(css: &str) -> String {
    strip_tags(css).replace('<', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Hello</b> world"), "Hello world");
        assert_eq!(strip_tags("a > b"), "a > b");
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  Add\n to \t cart  "), "Add to cart");
        assert_eq!(sanitize_text("<script>x</script>Buy"), "xBuy");
        assert_eq!(sanitize_text(""), "");
    }

    #[test]
    fn test_sanitize_textarea_keeps_newlines() {
        assert_eq!(sanitize_textarea("  line one\nline <i>two</i> \n"), "line one\nline two");
    }

    #[test]
    fn test_sanitize_css_for_style() {
        let css = "html[lang=\"ar\"] .a > .b { top: 0 }</style><script>alert(1)</script>";
        let cleaned = sanitize_css_for_style(css);
        assert!(!cleaned.contains("</style"));
        assert!(cleaned.starts_with("html[lang=\"ar\"] .a > .b { top: 0 }"));
        assert_eq!(sanitize_css_for_style("a { } </style"), "a { } /style");
    }
}
