//! What visitors' pages receive: the translation map for the current
//! language and the `<style>` block with per-language CSS.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::Database;
use crate::language::LanguageCode;
use crate::overrides::translation_map;
use crate::sanitize::sanitize_css_for_style;
use crate::settings::{Priority, Settings};
use crate::styles::StyleStore;

/// Data handed to the page script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontendPayload {
    pub enabled: bool,
    pub current_language: Option<LanguageCode>,
    /// Whether the current language is written right to left
    pub rtl: bool,
    pub default_language: LanguageCode,
    pub translations: BTreeMap<String, String>,
    pub priority: Priority,
}

/// Build the payload for a visitor of `current_language`.
///
/// The default language and disabled frontends get an empty map.
pub async fn frontend_payload(
    db: &Database,
    settings: &Settings,
    current_language: Option<&LanguageCode>,
    default_language: &LanguageCode,
) -> Result<FrontendPayload> {
    let translations = match current_language {
        Some(language) if settings.enable_frontend && language != default_language => {
            translation_map(db, language).await?
        }
        _ => BTreeMap::new(),
    };

    Ok(FrontendPayload {
        enabled: settings.enable_frontend,
        current_language: current_language.cloned(),
        rtl: current_language.is_some_and(LanguageCode::is_rtl),
        default_language: default_language.clone(),
        translations,
        priority: settings.translation_priority,
    })
}

/// Fetch the processed CSS of each language, in order.
pub async fn collect_language_styles(
    styles: &StyleStore,
    languages: &[LanguageCode],
) -> Result<Vec<(LanguageCode, String)>> {
    let mut collected = Vec::with_capacity(languages.len());
    for language in languages {
        collected.push((language.clone(), styles.processed_css(language).await?));
    }
    Ok(collected)
}

/// Render the `<style>` element for the page head.
///
/// Right-to-left base rules come first, then every non-empty language
/// stylesheet under its own comment header.
pub fn render_style_block(language_styles: &[(LanguageCode, String)]) -> String {
    let rtl: Vec<&str> = LanguageCode::rtl_languages().to_vec();
    let translated_selectors: Vec<String> = rtl
        .iter()
        .map(|code| format!("html[lang=\"{}\"] [data-trp-tm-translated]", code))
        .collect();
    let untranslated_selectors: Vec<String> = rtl
        .iter()
        .map(|code| format!("html[lang=\"{}\"] [data-no-translation]", code))
        .collect();

    let mut block = String::from("<style type=\"text/css\">\n");
    block.push_str(&format!(
        "{} {{\n    direction: rtl;\n    text-align: right;\n}}\n\n",
        translated_selectors.join(",\n")
    ));
    block.push_str(&format!(
        "{} {{\n    direction: ltr !important;\n    text-align: left !important;\n}}\n",
        untranslated_selectors.join(",\n")
    ));

    for (language, css) in language_styles {
        if css.trim().is_empty() {
            continue;
        }
        block.push_str(&format!(
            "\n/* Custom CSS for {} */\n{}\n",
            language,
            sanitize_css_for_style(css)
        ));
    }

    block.push_str("</style>");
    block
}
