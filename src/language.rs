//! Language code type: validated, opaque language identifiers.
//!
//! The vocabulary of codes belongs to the host translation engine ("ar",
//! "fr", "en_US", ...). We only check that a code is present and short
//! enough to use as a storage key and inside an attribute selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest accepted code, matching the storage column width.
pub const MAX_LANGUAGE_CODE_LEN: usize = 10;

/// Languages written right to left, by base code.
const RTL_LANGUAGES: &[&str] = &["ar", "he", "fa", "ur"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageCodeError {
    #[error("Language code is required")]
    Empty,

    #[error("Language code '{0}' is longer than 10 characters")]
    TooLong(String),

    #[error("Language code '{code}' contains invalid character '{invalid}'")]
    InvalidCharacter { code: String, invalid: char },
}

/// A validated language code.
///
/// Codes are trimmed and may contain ASCII letters, digits, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse and validate a language code.
    ///
    /// # Example
    /// ```
    /// use translate_map::language::LanguageCode;
    ///
    /// let arabic = LanguageCode::parse(" ar ").unwrap();
    /// assert_eq!(arabic.as_str(), "ar");
    /// assert!(arabic.is_rtl());
    /// ```
    pub fn parse(code: &str) -> Result<Self, LanguageCodeError> {
        let code = code.trim();

        if code.is_empty() {
            return Err(LanguageCodeError::Empty);
        }
        if code.chars().count() > MAX_LANGUAGE_CODE_LEN {
            return Err(LanguageCodeError::TooLong(code.to_string()));
        }
        if let Some(invalid) = code
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(LanguageCodeError::InvalidCharacter {
                code: code.to_string(),
                invalid,
            });
        }

        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before any region suffix (`pt_BR` -> `pt`).
    pub fn base(&self) -> &str {
        self.0
            .split(|c| c == '_' || c == '-')
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// Whether the language is written right to left.
    pub fn is_rtl(&self) -> bool {
        let base = self.base().to_ascii_lowercase();
        RTL_LANGUAGES.contains(&base.as_str())
    }

    /// Base codes of all right-to-left languages we style specially.
    pub fn rtl_languages() -> &'static [&'static str] {
        RTL_LANGUAGES
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LanguageCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_codes() {
        assert_eq!(LanguageCode::parse("ar").unwrap().as_str(), "ar");
        assert_eq!(LanguageCode::parse("en_US").unwrap().as_str(), "en_US");
        assert_eq!(LanguageCode::parse("zh-Hant").unwrap().as_str(), "zh-Hant");
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(LanguageCode::parse("  fr \n").unwrap().as_str(), "fr");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(LanguageCode::parse(""), Err(LanguageCodeError::Empty));
        assert_eq!(LanguageCode::parse("   "), Err(LanguageCodeError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            LanguageCode::parse("abcdefghijk"),
            Err(LanguageCodeError::TooLong(_))
        ));
        assert!(LanguageCode::parse("abcdefghij").is_ok());
    }

    #[test]
    fn test_parse_invalid_character() {
        let err = LanguageCode::parse("a\"r").unwrap_err();
        assert_eq!(
            err,
            LanguageCodeError::InvalidCharacter {
                code: "a\"r".to_string(),
                invalid: '"'
            }
        );
        assert!(LanguageCode::parse("fr fr").is_err());
    }

    #[test]
    fn test_rtl_detection() {
        assert!(LanguageCode::parse("ar").unwrap().is_rtl());
        assert!(LanguageCode::parse("he_IL").unwrap().is_rtl());
        assert!(LanguageCode::parse("FA").unwrap().is_rtl());
        assert!(!LanguageCode::parse("fr").unwrap().is_rtl());
        assert!(!LanguageCode::parse("urd").unwrap().is_rtl());
    }

    #[test]
    fn test_base() {
        assert_eq!(LanguageCode::parse("pt_BR").unwrap().base(), "pt");
        assert_eq!(LanguageCode::parse("de").unwrap().base(), "de");
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let code: LanguageCode = serde_json::from_str("\"es\"").unwrap();
        assert_eq!(code.as_str(), "es");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"es\"");
        assert!(serde_json::from_str::<LanguageCode>("\"\"").is_err());
    }
}
