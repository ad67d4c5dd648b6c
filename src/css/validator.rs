//! Lightweight CSS linting for the admin editor.
//!
//! This is a line-based brace and semicolon checker, not a CSS grammar.
//! Colons inside data URIs and similar constructs can produce false
//! positives; the report is advisory only.

use serde::Serialize;

/// Validation report containing errors and warnings about a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Structural problems (brace mismatch)
    pub errors: Vec<String>,

    /// Style issues that do not break the stylesheet outright
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// One-line summary suitable for a status notice.
    pub fn summary(&self) -> String {
        if self.has_errors() {
            format!("CSS validation failed: {}", self.errors.join(", "))
        } else if self.has_warnings() {
            format!(
                "CSS validation passed with warnings: {}",
                self.warnings.join(", ")
            )
        } else {
            "CSS validation passed successfully!".to_string()
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Lint a stylesheet line by line.
///
/// Blank lines and comment lines are skipped. Lines are numbered from 1.
pub fn validate(css: &str) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut depth: i64 = 0;
    let mut in_rule = false;

    for (index, raw_line) in css.split('\n').enumerate() {
        let line = raw_line.trim();
        let line_number = index + 1;

        if line.is_empty() || line.starts_with("/*") || line.starts_with('*') {
            continue;
        }

        let opening = line.matches('{').count() as i64;
        let closing = line.matches('}').count() as i64;
        depth += opening - closing;

        if opening > 0 {
            in_rule = true;
        }
        if closing > 0 {
            in_rule = false;
        }

        if in_rule
            && line.contains(':')
            && !line.contains(';')
            && !line.contains('{')
            && !line.contains('}')
        {
            report
                .warnings
                .push(format!("Line {}: Missing semicolon", line_number));
        }

        if line.contains(";;") {
            report
                .warnings
                .push(format!("Line {}: Double semicolon", line_number));
        }
    }

    if depth != 0 {
        let kind = if depth > 0 { "unclosed" } else { "extra closing" };
        report.errors.push(format!(
            "Mismatched braces: {} {} brace(s)",
            depth.abs(),
            kind
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_clean_css() {
        let report = validate(".a {\n    color: red;\n}\n\n.b { top: 0; }");
        assert!(report.is_clean());
        assert_eq!(report.summary(), "CSS validation passed successfully!");
    }

    #[test]
    fn test_validate_missing_closing_brace() {
        let report = validate(".a { color: red");
        assert_eq!(
            report.errors,
            vec!["Mismatched braces: 1 unclosed brace(s)".to_string()]
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_validate_extra_closing_brace() {
        let report = validate(".a { color: red; }\n}\n}");
        assert_eq!(
            report.errors,
            vec!["Mismatched braces: 2 extra closing brace(s)".to_string()]
        );
    }

    #[test]
    fn test_validate_missing_semicolon() {
        let report = validate(".a {\n    color: red\n    margin: 0;\n}");
        assert!(!report.has_errors());
        assert_eq!(report.warnings, vec!["Line 2: Missing semicolon".to_string()]);
        assert_eq!(
            report.summary(),
            "CSS validation passed with warnings: Line 2: Missing semicolon"
        );
    }

    #[test]
    fn test_validate_colon_outside_rule_not_flagged() {
        let report = validate("a:hover\n{\n  top: 0;\n}");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_double_semicolon() {
        let report = validate(".a {\n    color: red;;\n}");
        assert_eq!(report.warnings, vec!["Line 2: Double semicolon".to_string()]);
    }

    #[test]
    fn test_validate_skips_comment_lines() {
        let report = validate("/* a: b */\n * note: x\n.a {\n  top: 0;\n}");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_empty_input() {
        assert!(validate("").is_clean());
    }

    #[test]
    fn test_validate_error_summary() {
        let report = validate(".a {");
        assert_eq!(
            report.summary(),
            "CSS validation failed: Mismatched braces: 1 unclosed brace(s)"
        );
    }
}
