use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::language::{LanguageCode, LanguageCodeError};
use crate::sanitize::{sanitize_text, sanitize_textarea};

/// Longest accepted original text, matching the storage column width.
pub const MAX_ORIGINAL_TEXT_LEN: usize = 500;

const TRANSLATION_COLUMNS: &str =
    "id, original_text, translated_text, language_code, status, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Translation {
    pub id: i64,
    pub original_text: String,
    pub translated_text: String,
    pub language_code: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A translation pair as submitted, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTranslation {
    pub original_text: String,
    pub translated_text: String,
    pub language_code: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidTranslation {
    #[error("All fields are required.")]
    MissingField,

    #[error("Original text is longer than {} characters.", MAX_ORIGINAL_TEXT_LEN)]
    OriginalTooLong,

    #[error(transparent)]
    Language(#[from] LanguageCodeError),
}

impl NewTranslation {
    /// Build a pair from raw input, cleaning each field.
    pub fn new(original_text: &str, translated_text: &str, language_code: &str) -> Self {
        Self {
            original_text: sanitize_text(original_text),
            translated_text: sanitize_textarea(translated_text),
            language_code: sanitize_text(language_code),
        }
    }

    /// Check that the pair can be stored.
    pub fn check(&self) -> Result<LanguageCode, InvalidTranslation> {
        if self.original_text.is_empty()
            || self.translated_text.is_empty()
            || self.language_code.is_empty()
        {
            return Err(InvalidTranslation::MissingField);
        }
        if self.original_text.chars().count() > MAX_ORIGINAL_TEXT_LEN {
            return Err(InvalidTranslation::OriginalTooLong);
        }
        Ok(LanguageCode::parse(&self.language_code)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LanguageCount {
    pub language_code: String,
    pub count: i64,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub success: usize,
    pub errors: usize,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database at `database_url` and create tables
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        // Every in-memory connection is its own database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", database_url))?;

        let db = Self { pool };
        db.create_tables().await?;
        Ok(db)
    }

    /// Open (or create) a database file
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let db = Self { pool };
        db.create_tables().await?;
        Ok(db)
    }

    /// Create tables (safe to run always)
    async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                original_text TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                language_code TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (original_text, language_code)
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create translations table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_translations_language ON translations (language_code)",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create language index")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_translations_status ON translations (status)")
            .execute(&self.pool)
            .await
            .context("Failed to create status index")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS options (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create options table")?;

        Ok(())
    }

    // ==================== Translations ====================

    /// Insert a translation, or update the existing one for the same
    /// original text and language. Returns the row id.
    pub async fn save_translation(
        &self,
        original_text: &str,
        translated_text: &str,
        language_code: &str,
    ) -> Result<i64> {
        let now = Utc::now().to_rfc3339();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO translations
                (original_text, translated_text, language_code, status, created_at, updated_at)
             VALUES (?, ?, ?, 'active', ?, ?)
             ON CONFLICT (original_text, language_code) DO UPDATE SET
                translated_text = excluded.translated_text,
                status = 'active',
                updated_at = excluded.updated_at
             RETURNING id",
        )
        .bind(original_text)
        .bind(translated_text)
        .bind(language_code)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to save translation")?;

        debug!(id, language = language_code, "Saved translation");
        Ok(id)
    }

    /// Get the active translation of `original_text` for a language
    pub async fn get_translation(
        &self,
        original_text: &str,
        language_code: &str,
    ) -> Result<Option<String>> {
        let translated = sqlx::query_scalar(
            "SELECT translated_text FROM translations
             WHERE original_text = ? AND language_code = ? AND status = 'active'",
        )
        .bind(original_text)
        .bind(language_code)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up translation")?;

        Ok(translated)
    }

    pub async fn get_translation_by_id(&self, id: i64) -> Result<Option<Translation>> {
        let translation = sqlx::query_as::<_, Translation>(&format!(
            "SELECT {} FROM translations WHERE id = ?",
            TRANSLATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get translation")?;

        Ok(translation)
    }

    /// Get all active (original, translated) pairs for a language
    pub async fn get_translations_by_language(
        &self,
        language_code: &str,
    ) -> Result<Vec<(String, String)>> {
        let pairs = sqlx::query_as::<_, (String, String)>(
            "SELECT original_text, translated_text FROM translations
             WHERE language_code = ? AND status = 'active'
             ORDER BY original_text",
        )
        .bind(language_code)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list translations for language")?;

        Ok(pairs)
    }

    /// Get all active translations ordered by language, then original text
    pub async fn get_all_translations(&self) -> Result<Vec<Translation>> {
        let translations = sqlx::query_as::<_, Translation>(&format!(
            "SELECT {} FROM translations WHERE status = 'active'
             ORDER BY language_code, original_text",
            TRANSLATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list translations")?;

        Ok(translations)
    }

    /// Delete a translation. Returns false if no row had that id.
    pub async fn delete_translation(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM translations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete translation")?;

        Ok(result.rows_affected() > 0)
    }

    /// Substring search over original and translated text, optionally
    /// restricted to one language
    pub async fn search_translations(
        &self,
        search_term: &str,
        language_code: Option<&str>,
    ) -> Result<Vec<Translation>> {
        let pattern = format!("%{}%", escape_like(search_term));
        let language = language_code.unwrap_or("");

        let translations = sqlx::query_as::<_, Translation>(&format!(
            "SELECT {} FROM translations
             WHERE (original_text LIKE ? ESCAPE '\\' OR translated_text LIKE ? ESCAPE '\\')
               AND status = 'active'
               AND (? = '' OR language_code = ?)
             ORDER BY language_code, original_text",
            TRANSLATION_COLUMNS
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(language)
        .bind(language)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search translations")?;

        Ok(translations)
    }

    /// Count active translations per language
    pub async fn translation_counts(&self) -> Result<Vec<LanguageCount>> {
        let counts = sqlx::query_as::<_, LanguageCount>(
            "SELECT language_code, COUNT(*) AS count FROM translations
             WHERE status = 'active'
             GROUP BY language_code
             ORDER BY language_code",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to count translations")?;

        Ok(counts)
    }

    /// Save many translations, counting the ones that could not be stored
    pub async fn bulk_import(&self, translations: &[NewTranslation]) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for translation in translations {
            let language = match translation.check() {
                Ok(language) => language,
                Err(e) => {
                    debug!(
                        error = %e,
                        original = %translation.original_text,
                        "Skipping invalid translation"
                    );
                    summary.errors += 1;
                    continue;
                }
            };

            match self
                .save_translation(
                    &translation.original_text,
                    &translation.translated_text,
                    language.as_str(),
                )
                .await
            {
                Ok(_) => summary.success += 1,
                Err(e) => {
                    warn!(error = %e, "Failed to import translation");
                    summary.errors += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Translations to export: one language, or everything
    pub async fn export_translations(
        &self,
        language_code: Option<&str>,
    ) -> Result<Vec<Translation>> {
        match language_code {
            Some(language) => {
                let translations = sqlx::query_as::<_, Translation>(&format!(
                    "SELECT {} FROM translations
                     WHERE language_code = ? AND status = 'active'
                     ORDER BY original_text",
                    TRANSLATION_COLUMNS
                ))
                .bind(language)
                .fetch_all(&self.pool)
                .await
                .context("Failed to export translations")?;
                Ok(translations)
            }
            None => self.get_all_translations().await,
        }
    }

    // ==================== Options ====================

    pub async fn get_option(&self, name: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM options WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read option {}", name))?;

        Ok(value)
    }

    pub async fn set_option(&self, name: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO options (name, value) VALUES (?, ?)
             ON CONFLICT (name) DO UPDATE SET value = excluded.value",
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write option {}", name))?;

        Ok(())
    }

    /// Write several options in one transaction; either all are stored or
    /// none is.
    pub async fn set_options(&self, options: &[(&str, &str)]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin options transaction")?;

        for (name, value) in options {
            sqlx::query(
                "INSERT INTO options (name, value) VALUES (?, ?)
                 ON CONFLICT (name) DO UPDATE SET value = excluded.value",
            )
            .bind(*name)
            .bind(*value)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to write option {}", name))?;
        }

        tx.commit()
            .await
            .context("Failed to commit options transaction")?;

        Ok(())
    }

    pub async fn delete_option(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM options WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete option {}", name))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
