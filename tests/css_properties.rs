//! Property tests for the CSS scoping transform and the minifier.

use proptest::prelude::*;
use translate_map::css::{is_scoped, minify, parse_rules, process, transform};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn language() -> impl Strategy<Value = String> {
    "[a-z]{2}(-[A-Z]{2})?"
}

fn selector() -> impl Strategy<Value = String> {
    "[.#]?[a-z]{1,6}( [a-z]{1,4})?(:hover)?"
}

fn declaration() -> impl Strategy<Value = String> {
    "[a-z]{1,8}: ?[a-z0-9]{1,5}"
}

fn rule() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(selector(), 1..4),
        prop::collection::vec(declaration(), 0..4),
    )
        .prop_map(|(selectors, declarations)| {
            format!("{} {{ {} }}", selectors.join(", "), declarations.join("; "))
        })
}

fn stylesheet() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => rule(),
            1 => Just("@import url(base.css);".to_string()),
            1 => rule().prop_map(|r| format!("@media (max-width: 600px) {{ {} }}", r)),
            1 => "/\\* [a-z ]{0,10} \\*/",
        ],
        0..6,
    )
    .prop_map(|parts| parts.join("\n"))
}

/// Loosely CSS-shaped text, including unbalanced braces and stray at-signs.
fn css_soup() -> impl Strategy<Value = String> {
    "[a-z .#:,;{}@()\\[\\]=\n/*-]{0,80}"
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn transform_is_idempotent(css in stylesheet(), lang in language()) {
        let once = transform(&css, &lang).unwrap();
        let twice = transform(&once, &lang).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn transform_is_idempotent_on_malformed_input(css in css_soup(), lang in language()) {
        let once = transform(&css, &lang).unwrap();
        let twice = transform(&once, &lang).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn transform_rejects_or_stays_idempotent_for_any_code(
        css in stylesheet(),
        code in "[a-z\"'<>&\\\\ \t\n\r]{1,6}",
    ) {
        if let Ok(once) = transform(&css, &code) {
            let twice = transform(&once, &code).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn transform_is_deterministic(css in css_soup(), lang in language()) {
        prop_assert_eq!(transform(&css, &lang).unwrap(), transform(&css, &lang).unwrap());
    }

    #[test]
    fn every_rule_selector_is_scoped(css in stylesheet(), lang in language()) {
        let scoped = transform(&css, &lang).unwrap();
        let prefix = format!("html[lang=\"{}\"]", lang);

        for rule in parse_rules(&scoped) {
            for selector in &rule.selectors {
                prop_assert!(is_scoped(selector), "unscoped selector {:?}", selector);
                prop_assert!(selector.starts_with(&prefix));
            }
        }
    }

    #[test]
    fn transform_output_has_no_comments(css in stylesheet(), lang in language()) {
        let scoped = transform(&css, &lang).unwrap();
        prop_assert!(!scoped.contains("/*"));
    }

    #[test]
    fn blank_input_gives_blank_output(ws in "[ \t\n]{0,10}", lang in language()) {
        prop_assert_eq!(transform(&ws, &lang).unwrap(), "");
    }

    #[test]
    fn minify_is_idempotent(css in css_soup()) {
        let once = minify(&css);
        prop_assert_eq!(minify(&once), once);
    }

    #[test]
    fn minify_leaves_no_removable_whitespace(css in stylesheet()) {
        let minified = minify(&css);

        prop_assert!(!minified.contains("  "));
        prop_assert!(!minified.contains('\n'));
        prop_assert!(!minified.contains("/*"));
        for punct in ['{', '}', ';', ',', ':'] {
            let space_before = format!(" {}", punct);
            let space_after = format!("{} ", punct);
            prop_assert!(!minified.contains(&space_before));
            prop_assert!(!minified.contains(&space_after));
        }
        prop_assert_eq!(minified.trim(), minified.as_str());
    }

    #[test]
    fn process_minified_equals_minify_of_transform(css in stylesheet(), lang in language()) {
        let expected = minify(&transform(&css, &lang).unwrap());
        prop_assert_eq!(process(&css, &lang, true).unwrap(), expected);
    }
}
