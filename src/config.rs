use anyhow::{Context, Result};

use crate::language::LanguageCode;

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub database_url: String,

    // Server
    pub port: u16,
    pub admin_api_key: Option<String>,

    // Languages (owned by the host translation engine)
    pub default_language: LanguageCode,
    pub translation_languages: Vec<LanguageCode>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://translate-map.db".to_string()),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            // Empty key means the admin API stays closed
            admin_api_key: std::env::var("ADMIN_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),

            default_language: LanguageCode::parse(
                &std::env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            )
            .context("DEFAULT_LANGUAGE is not a valid language code")?,

            translation_languages: parse_language_list(
                &std::env::var("TRANSLATION_LANGUAGES").unwrap_or_default(),
            )
            .context("TRANSLATION_LANGUAGES contains an invalid language code")?,
        })
    }
}

/// Parse a comma-separated list of language codes, skipping blanks and
/// duplicates while keeping the first-seen order.
pub fn parse_language_list(value: &str) -> Result<Vec<LanguageCode>> {
    let mut languages: Vec<LanguageCode> = Vec::new();

    for part in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let code = LanguageCode::parse(part)?;
        if !languages.contains(&code) {
            languages.push(code);
        }
    }

    Ok(languages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DATABASE_URL",
        "PORT",
        "ADMIN_API_KEY",
        "DEFAULT_LANGUAGE",
        "TRANSLATION_LANGUAGES",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().expect("defaults should load");
        assert_eq!(config.database_url, "sqlite://translate-map.db");
        assert_eq!(config.port, 8080);
        assert!(config.admin_api_key.is_none());
        assert_eq!(config.default_language.as_str(), "en");
        assert!(config.translation_languages.is_empty());
    }

    #[test]
    #[serial]
    fn test_from_env_custom_values() {
        clear_env();
        std::env::set_var("DATABASE_URL", "sqlite:///tmp/map.db");
        std::env::set_var("PORT", "9090");
        std::env::set_var("ADMIN_API_KEY", " secret ");
        std::env::set_var("DEFAULT_LANGUAGE", "fr");
        std::env::set_var("TRANSLATION_LANGUAGES", "ar, de,,ar");

        let config = Config::from_env().expect("should load");
        assert_eq!(config.database_url, "sqlite:///tmp/map.db");
        assert_eq!(config.port, 9090);
        assert_eq!(config.admin_api_key.as_deref(), Some("secret"));
        assert_eq!(config.default_language.as_str(), "fr");
        let languages: Vec<&str> = config
            .translation_languages
            .iter()
            .map(|l| l.as_str())
            .collect();
        assert_eq!(languages, vec!["ar", "de"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port_falls_back() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");

        let config = Config::from_env().expect("should load");
        assert_eq!(config.port, 8080);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_blank_api_key_is_none() {
        clear_env();
        std::env::set_var("ADMIN_API_KEY", "   ");

        let config = Config::from_env().expect("should load");
        assert!(config.admin_api_key.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_language_list() {
        clear_env();
        std::env::set_var("TRANSLATION_LANGUAGES", "ar,not a code");

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_parse_language_list() {
        let list = parse_language_list(" es ,fr_FR").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].as_str(), "fr_FR");
        assert!(parse_language_list("").unwrap().is_empty());
    }
}
