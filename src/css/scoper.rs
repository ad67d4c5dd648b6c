//! Language scoping for admin-authored CSS.
//!
//! Every selector is rewritten so the rule only applies when the document
//! root declares the target language:
//!
//! ```text
//! .btn, .nav a { color: red; }
//! ```
//!
//! becomes
//!
//! ```text
//! html[lang="ar"] .btn, html[lang="ar"] .nav a { color: red; }
//! ```
//!
//! Selectors that already start with an `html[lang=...]` check are left
//! alone, so running the transform over its own output changes nothing.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::strip_comments;

/// Errors raised at the transformer boundary.
///
/// Malformed CSS is never an error; only an unusable language code is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CssError {
    #[error("Language code is required")]
    EmptyLanguageCode,

    #[error("Language code {0:?} contains a character not allowed in a selector")]
    InvalidLanguageCode(String),
}

/// A selector list with its brace-delimited body, borrowed from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule<'a> {
    /// Individual selectors, trimmed, in source order
    pub selectors: Vec<&'a str>,
    /// The declaration block including its outer braces
    pub block: &'a str,
}

/// One top-level unit found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Rule(CssRule<'a>),
    /// `@media … { … }`, `@import …;` and friends, emitted untouched
    AtRule(&'a str),
    /// Text that is not part of a complete rule
    Leftover(&'a str),
}

// Matches a selector that is already scoped to some root language
static SCOPED_SELECTOR_REGEX: OnceLock<Regex> = OnceLock::new();

fn scoped_selector_regex() -> &'static Regex {
    SCOPED_SELECTOR_REGEX.get_or_init(|| {
        Regex::new(r#"^html\s*\[\s*lang\s*=\s*(?:"[^"]*"|'[^']*')\s*\]"#)
            .expect("scoped selector regex is valid")
    })
}

/// Check whether a selector already carries a root language check.
pub fn is_scoped(selector: &str) -> bool {
    scoped_selector_regex().is_match(selector.trim_start())
}

/// Stateless scoper bound to one language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageScoper {
    prefix: String,
}

impl LanguageScoper {
    /// Create a scoper for the given language code.
    ///
    /// # Returns
    /// * `Err(CssError::EmptyLanguageCode)` if the code is blank
    /// * `Err(CssError::InvalidLanguageCode)` if the code would break the
    ///   attribute string or the line structure of the output
    pub fn new(language_code: &str) -> Result<Self, CssError> {
        let code = language_code.trim();
        if code.is_empty() {
            return Err(CssError::EmptyLanguageCode);
        }
        if code
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '\\')
        {
            return Err(CssError::InvalidLanguageCode(code.to_string()));
        }

        Ok(Self {
            prefix: format!(r#"html[lang="{}"]"#, escape_attribute(code)),
        })
    }

    /// The attribute selector prepended to every unscoped selector.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Scope a single selector, leaving already-scoped selectors unchanged.
    pub fn scope_selector(&self, selector: &str) -> String {
        let selector = selector.trim();
        if is_scoped(selector) {
            selector.to_string()
        } else {
            format!("{} {}", self.prefix, selector)
        }
    }

    /// Scope a whole stylesheet.
    ///
    /// Comments are stripped first. Rules come out as
    /// `sel1, sel2 {block}` separated by a blank line, at-rules are copied
    /// verbatim and any leftover fragment is prefixed line by line.
    pub fn scope(&self, css: &str) -> String {
        let source = strip_comments(css);
        let mut pieces: Vec<String> = Vec::new();

        for segment in Scanner::new(&source) {
            match segment {
                Segment::Rule(rule) => pieces.push(self.scope_rule(&rule)),
                Segment::AtRule(text) => pieces.push(text.trim().to_string()),
                Segment::Leftover(text) => {
                    let lines: Vec<String> = text
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(|line| {
                            if line.starts_with('@') {
                                line.to_string()
                            } else {
                                self.scope_selector(line)
                            }
                        })
                        .collect();

                    if !lines.is_empty() {
                        pieces.push(lines.join("\n"));
                    }
                }
            }
        }

        pieces.join("\n\n").trim().to_string()
    }

    fn scope_rule(&self, rule: &CssRule<'_>) -> String {
        let selectors: Vec<String> = if rule.selectors.is_empty() {
            // A bare block applies to the root element itself
            vec![self.prefix.clone()]
        } else {
            rule.selectors
                .iter()
                .map(|selector| self.scope_selector(selector))
                .collect()
        };

        format!("{} {}", selectors.join(", "), rule.block)
    }
}

/// Scope `css` under `html[lang="<language_code>"]`.
///
/// Empty input gives empty output. Malformed CSS is handled on a best-effort
/// basis and never fails.
///
/// # Returns
/// * `Err(CssError::EmptyLanguageCode)` if the language code is blank
/// * `Err(CssError::InvalidLanguageCode)` if it holds whitespace, a control
///   character or a backslash
pub fn transform(css: &str, language_code: &str) -> Result<String, CssError> {
    let scoper = LanguageScoper::new(language_code)?;
    Ok(scoper.scope(css))
}

/// Parse the complete rule blocks of a stylesheet, skipping at-rules and
/// fragments. Comments are expected to be stripped already.
pub fn parse_rules(css: &str) -> Vec<CssRule<'_>> {
    Scanner::new(css)
        .filter_map(|segment| match segment {
            Segment::Rule(rule) => Some(rule),
            _ => None,
        })
        .collect()
}

/// Single-pass scanner splitting a stylesheet into top-level segments.
struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let bytes = self.source.as_bytes();

        let rest = &self.source[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        let at_rule = bytes[start] == b'@';
        let mut i = start;

        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => i = skip_string(bytes, i),
                b';' if at_rule => {
                    self.pos = i + 1;
                    return Some(Segment::AtRule(&self.source[start..=i]));
                }
                b'{' => {
                    let Some(close) = matching_brace(bytes, i) else {
                        self.pos = bytes.len();
                        return Some(Segment::Leftover(&self.source[start..]));
                    };

                    self.pos = close + 1;
                    if at_rule {
                        return Some(Segment::AtRule(&self.source[start..=close]));
                    }
                    return Some(Segment::Rule(CssRule {
                        selectors: split_selectors(&self.source[start..i]),
                        block: &self.source[i..=close],
                    }));
                }
                b'}' => {
                    self.pos = i + 1;
                    return Some(Segment::Leftover(&self.source[start..=i]));
                }
                _ => i += 1,
            }
        }

        self.pos = bytes.len();
        Some(Segment::Leftover(&self.source[start..]))
    }
}

/// Index of the `}` closing the `{` at `open`, honouring nesting and quotes.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Index just past the string literal starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }

    bytes.len()
}

/// Split a selector list on commas that are not nested in `()`, `[]` or quotes.
fn split_selectors(list: &str) -> Vec<&str> {
    let bytes = list.as_bytes();
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                selectors.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    selectors.push(&list[start.min(list.len())..]);

    selectors
        .into_iter()
        .map(str::trim)
        .filter(|selector| !selector.is_empty())
        .collect()
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
