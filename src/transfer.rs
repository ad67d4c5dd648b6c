//! Moving translations in and out in bulk: pipe-separated paste, CSV files.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::{NewTranslation, Translation};
use crate::language::LanguageCode;

pub const CSV_HEADER: &str = "Original Text,Translation,Language Code";

/// Malformed lines in a pipe-separated bulk paste.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", .lines.join("\n"))]
pub struct BulkFormatError {
    pub lines: Vec<String>,
}

/// Parse `Original|Translation|Language` lines.
///
/// Blank lines are skipped. If any line does not have exactly three parts,
/// nothing is returned and every offending line is reported.
pub fn parse_bulk(text: &str) -> Result<Vec<NewTranslation>, BulkFormatError> {
    let mut translations = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() != 3 {
            errors.push(format!(
                "Line {}: Invalid format. Expected: Original|Translation|Language",
                index + 1
            ));
            continue;
        }

        translations.push(NewTranslation::new(parts[0], parts[1], parts[2]));
    }

    if errors.is_empty() {
        Ok(translations)
    } else {
        Err(BulkFormatError { lines: errors })
    }
}

/// Parse an uploaded CSV file of `original, translation, language` rows.
///
/// A leading header row is skipped, rows with fewer than three columns are
/// ignored. Fails when no usable row is left.
pub fn parse_csv(data: &[u8]) -> Result<Vec<NewTranslation>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut translations = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Could not read CSV row {}", index + 1))?;

        if index == 0 {
            let first = record.get(0).unwrap_or("").trim().to_lowercase();
            if first == "original text" || first == "original_text" {
                continue;
            }
        }

        if record.len() < 3 {
            continue;
        }

        translations.push(NewTranslation::new(
            record.get(0).unwrap_or("").trim(),
            record.get(1).unwrap_or("").trim(),
            record.get(2).unwrap_or("").trim(),
        ));
    }

    if translations.is_empty() {
        bail!("No valid translations found in the file.");
    }

    Ok(translations)
}

/// Render translations as CSV with every field quoted.
pub fn export_csv(translations: &[Translation]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for translation in translations {
        writer
            .write_record([
                translation.original_text.as_str(),
                translation.translated_text.as_str(),
                translation.language_code.as_str(),
            ])
            .context("Failed to write CSV row")?;
    }

    let rows = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to finish CSV export: {}", e.error()))?;
    let rows = String::from_utf8(rows).context("CSV export is not valid UTF-8")?;

    Ok(format!("{}\n{}", CSV_HEADER, rows))
}

/// `trp-translations[-<lang>]-YYYY-MM-DD-HH-MM-SS.csv`
pub fn export_filename(language: Option<&LanguageCode>, at: DateTime<Utc>) -> String {
    let mut filename = String::from("trp-translations");
    if let Some(language) = language {
        filename.push('-');
        filename.push_str(language.as_str());
    }
    filename.push_str(&at.format("-%Y-%m-%d-%H-%M-%S.csv").to_string());
    filename
}
