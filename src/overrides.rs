//! Custom translation overrides on top of the host translation engine.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::db::Database;
use crate::language::LanguageCode;
use crate::settings::Priority;

/// Decide which translation a string ends up with.
///
/// With high priority a custom translation always replaces the engine's;
/// with low priority it is only used when the engine produced nothing.
pub fn resolve_override(
    engine_translation: Option<&str>,
    custom_translation: Option<&str>,
    priority: Priority,
) -> Option<String> {
    let engine = engine_translation.filter(|s| !s.is_empty());
    let custom = custom_translation.filter(|s| !s.is_empty());

    match (custom, priority) {
        (Some(custom), Priority::High) => Some(custom.to_string()),
        (Some(custom), Priority::Low) if engine.is_none() => Some(custom.to_string()),
        _ => engine.map(str::to_string),
    }
}

/// Look up the custom translation of `original` and resolve it against the
/// engine's translation.
pub async fn override_string(
    db: &Database,
    original: &str,
    engine_translation: Option<&str>,
    language: &LanguageCode,
    priority: Priority,
) -> Result<Option<String>> {
    let custom = db.get_translation(original, language.as_str()).await?;
    Ok(resolve_override(
        engine_translation,
        custom.as_deref(),
        priority,
    ))
}

/// All custom translations of a language as an original -> translated map.
pub async fn translation_map(
    db: &Database,
    language: &LanguageCode,
) -> Result<BTreeMap<String, String>> {
    let pairs = db.get_translations_by_language(language.as_str()).await?;
    Ok(pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_high_priority_always_uses_custom() {
        assert_eq!(
            resolve_override(Some("Engine"), Some("Custom"), Priority::High),
            Some("Custom".to_string())
        );
        assert_eq!(
            resolve_override(None, Some("Custom"), Priority::High),
            Some("Custom".to_string())
        );
    }

    #[test]
    fn test_low_priority_only_fills_gaps() {
        assert_eq!(
            resolve_override(Some("Engine"), Some("Custom"), Priority::Low),
            Some("Engine".to_string())
        );
        assert_eq!(
            resolve_override(Some(""), Some("Custom"), Priority::Low),
            Some("Custom".to_string())
        );
        assert_eq!(
            resolve_override(None, Some("Custom"), Priority::Low),
            Some("Custom".to_string())
        );
    }

    #[test]
    fn test_no_custom_keeps_engine() {
        assert_eq!(
            resolve_override(Some("Engine"), None, Priority::High),
            Some("Engine".to_string())
        );
        assert_eq!(
            resolve_override(Some("Engine"), Some(""), Priority::High),
            Some("Engine".to_string())
        );
        assert_eq!(resolve_override(None, None, Priority::Low), None);
    }

    #[tokio::test]
    async fn test_override_string_and_map() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open(&temp_dir.path().join("overrides.db"))
            .await
            .expect("db");
        let fr = LanguageCode::parse("fr").unwrap();

        db.save_translation("Cart", "Panier", "fr").await.expect("save");
        db.save_translation("Buy", "Acheter", "fr").await.expect("save");
        db.save_translation("Buy", "Kaufen", "de").await.expect("save");

        let resolved = override_string(&db, "Cart", Some("Chariot"), &fr, Priority::High)
            .await
            .expect("override");
        assert_eq!(resolved.as_deref(), Some("Panier"));

        let resolved = override_string(&db, "Cart", Some("Chariot"), &fr, Priority::Low)
            .await
            .expect("override");
        assert_eq!(resolved.as_deref(), Some("Chariot"));

        let resolved = override_string(&db, "Unknown", None, &fr, Priority::High)
            .await
            .expect("override");
        assert!(resolved.is_none());

        let map = translation_map(&db, &fr).await.expect("map");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Buy").map(String::as_str), Some("Acheter"));
    }
}
