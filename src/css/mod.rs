//! Per-language CSS processing.
//!
//! Admins author plain CSS for a language; before delivery it is scoped
//! under `html[lang="xx"]` and optionally minified. Everything here is pure
//! and synchronous.
//!
//! - `scoper`: the language scoping transform
//! - `minify`: whitespace and comment removal
//! - `validator`: advisory brace/semicolon linting for the editor
//! - `format`: editor pretty-printing

mod format;
mod minify;
mod scoper;
mod validator;

pub use format::format_css;
pub use minify::minify;
pub use scoper::{is_scoped, parse_rules, transform, CssError, CssRule, LanguageScoper};
pub use validator::{validate, ValidationReport};

/// Remove every `/* ... */` comment. An unterminated comment runs to the end
/// of the input.
pub fn strip_comments(css: &str) -> String {
    let mut stripped = strip_comments_once(css);
    // Removing a comment can join a `/` and a `*` into a new opener
    while stripped.contains("/*") {
        stripped = strip_comments_once(&stripped);
    }
    stripped
}

fn strip_comments_once(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;

    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }

    out.push_str(rest);
    out
}

/// Derive the delivered stylesheet for one language.
///
/// Blank sources give an empty stylesheet; otherwise the source is scoped
/// and, when `minify_output` is set, minified.
pub fn process(css: &str, language_code: &str, minify_output: bool) -> Result<String, CssError> {
    let scoped = transform(css, language_code)?;
    if minify_output {
        Ok(minify(&scoped))
    } else {
        Ok(scoped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a /* b */ c"), "a  c");
        assert_eq!(strip_comments("/**/x/* y */"), "x");
        assert_eq!(strip_comments("x /* open"), "x ");
        assert_eq!(strip_comments("no comments"), "no comments");
    }

    #[test]
    fn test_strip_comments_rejoined_opener() {
        assert_eq!(strip_comments("//* c */* x"), "");
        assert!(!strip_comments("//* c */* x */y").contains("/*"));
    }

    #[test]
    fn test_process_minified() {
        let output = process(".a {\n  color: red;\n}", "ar", true).unwrap();
        assert_eq!(output, r#"html[lang="ar"] .a{color:red;}"#);
    }

    #[test]
    fn test_process_unminified() {
        let output = process(".a { color: red; }", "ar", false).unwrap();
        assert_eq!(output, r#"html[lang="ar"] .a { color: red; }"#);
    }

    #[test]
    fn test_process_blank_source() {
        assert_eq!(process("  ", "ar", true).unwrap(), "");
        assert_eq!(process("/* only a comment */", "ar", false).unwrap(), "");
    }

    #[test]
    fn test_process_requires_language() {
        assert_eq!(process(".a {}", "", true), Err(CssError::EmptyLanguageCode));
    }
}
