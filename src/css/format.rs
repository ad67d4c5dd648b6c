use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
static OPEN_BRACE_REGEX: OnceLock<Regex> = OnceLock::new();
static SEMICOLON_REGEX: OnceLock<Regex> = OnceLock::new();
static CLOSE_BRACE_REGEX: OnceLock<Regex> = OnceLock::new();
static BLANK_LINES_REGEX: OnceLock<Regex> = OnceLock::new();

/// Pretty-print CSS for the editor: one declaration per line, four-space
/// indentation and a blank line after every closing brace.
///
/// Comments are kept. Blank input gives an empty string.
pub fn format_css(css: &str) -> String {
    let whitespace = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());
    let open_brace = OPEN_BRACE_REGEX.get_or_init(|| Regex::new(r"\s*\{\s*").unwrap());
    let semicolon = SEMICOLON_REGEX.get_or_init(|| Regex::new(r";\s*").unwrap());
    let close_brace = CLOSE_BRACE_REGEX.get_or_init(|| Regex::new(r"\s*\}\s*").unwrap());
    let blank_lines = BLANK_LINES_REGEX.get_or_init(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

    let formatted = whitespace.replace_all(css, " ");
    let formatted = open_brace.replace_all(&formatted, " {\n    ");
    let formatted = semicolon.replace_all(&formatted, ";\n    ");
    let formatted = close_brace.replace_all(&formatted, "\n}\n\n");
    let formatted = blank_lines.replace_all(&formatted, "\n\n");

    formatted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_single_rule() {
        assert_eq!(
            format_css(".a{color:red;margin:0}"),
            ".a {\n    color:red;\n    margin:0\n}"
        );
    }

    #[test]
    fn test_format_multiple_rules() {
        assert_eq!(
            format_css(".a { top: 0; } .b { left: 0; }"),
            ".a {\n    top: 0;\n}\n\n.b {\n    left: 0;\n}"
        );
    }

    #[test]
    fn test_format_blank() {
        assert_eq!(format_css("   \n  "), "");
    }
}
