use regex::Regex;
use std::sync::OnceLock;

use super::strip_comments;

static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
static PUNCTUATION_REGEX: OnceLock<Regex> = OnceLock::new();

/// Minify CSS: drop comments, collapse whitespace and remove spaces around
/// `{ } ; , :`.
///
/// Never fails; empty input gives empty output.
pub fn minify(css: &str) -> String {
    let whitespace = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());
    let punctuation =
        PUNCTUATION_REGEX.get_or_init(|| Regex::new(r"\s*([{};,:])\s*").unwrap());

    let css = strip_comments(css);
    let collapsed = whitespace.replace_all(&css, " ");
    punctuation.replace_all(&collapsed, "$1").trim().to_string()
}
