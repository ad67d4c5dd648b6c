//! Per-language custom CSS records.
//!
//! Each language has three options: the CSS as the admin wrote it, the
//! minify flag and the processed (scoped, maybe minified) CSS. The processed
//! form is rebuilt on every save and never written any other way.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::css;
use crate::db::Database;
use crate::language::LanguageCode;

fn custom_css_key(language: &LanguageCode) -> String {
    format!("custom_css_{}", language)
}

fn minify_key(language: &LanguageCode) -> String {
    format!("minify_css_{}", language)
}

fn processed_css_key(language: &LanguageCode) -> String {
    format!("processed_css_{}", language)
}

/// Stored CSS for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCss {
    pub language_code: LanguageCode,
    pub custom_css: String,
    pub processed_css: String,
    pub minify: bool,
}

#[derive(Clone)]
pub struct StyleStore {
    db: Database,
}

impl StyleStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Store the admin's CSS and regenerate the processed stylesheet.
    pub async fn save(
        &self,
        language: &LanguageCode,
        custom_css: &str,
        minify: bool,
    ) -> Result<LanguageCss> {
        let processed_css = css::process(custom_css, language.as_str(), minify)?;

        // Source, flag and processed CSS are written in one transaction
        let custom_key = custom_css_key(language);
        let minify_key = minify_key(language);
        let processed_key = processed_css_key(language);
        self.db
            .set_options(&[
                (custom_key.as_str(), custom_css),
                (minify_key.as_str(), if minify { "1" } else { "0" }),
                (processed_key.as_str(), processed_css.as_str()),
            ])
            .await?;

        info!(
            language = %language,
            minify,
            bytes = processed_css.len(),
            "Saved custom CSS"
        );

        Ok(LanguageCss {
            language_code: language.clone(),
            custom_css: custom_css.to_string(),
            processed_css,
            minify,
        })
    }

    /// Load the stored CSS for a language; missing records are empty.
    pub async fn load(&self, language: &LanguageCode) -> Result<LanguageCss> {
        let custom_css = self
            .db
            .get_option(&custom_css_key(language))
            .await?
            .unwrap_or_default();
        let minify = self
            .db
            .get_option(&minify_key(language))
            .await?
            .map(|v| v == "1")
            .unwrap_or(false);
        let processed_css = self.processed_css(language).await?;

        Ok(LanguageCss {
            language_code: language.clone(),
            custom_css,
            processed_css,
            minify,
        })
    }

    /// The stylesheet delivered to visitors of `language`.
    pub async fn processed_css(&self, language: &LanguageCode) -> Result<String> {
        Ok(self
            .db
            .get_option(&processed_css_key(language))
            .await?
            .unwrap_or_default())
    }
}
