// Properties of reference extraction and title acceptance.
//
// Table-driven: each case is a realistic comment rather than a generated
// string, but every case checks the same invariant.

use gamebot::catalog::fuzzy::partial_ratio;
use gamebot::catalog::models::CatalogGameRecord;
use gamebot::catalog::resolver::{accepts, MATCH_THRESHOLD};
use gamebot::extract::extract_references;

// ============================================================
// Extraction
// ============================================================

#[test]
fn markdown_link_labels_never_leak() {
    let cases = [
        ("[Stalker 2](https://dtf.ru/games/1)", "Stalker 2"),
        ("смотри [тут](https://example.com) и [Hades]", "тут"),
        ("[Elden Ring](https://rawg.io/games/elden-ring) [Elden Ring]", "__none__"),
        ("{Dota 2} [обзор](http://a.b/c?d=e)", "обзор"),
    ];
    for (text, label) in cases {
        let refs = extract_references(text);
        assert!(
            !refs.iter().any(|r| r == label),
            "label {label:?} leaked from {text:?}: {refs:?}"
        );
    }
    assert_eq!(
        extract_references("[Elden Ring](https://rawg.io/games/elden-ring) [Elden Ring]"),
        vec!["Elden Ring"]
    );
}

#[test]
fn short_numbers_are_footnotes() {
    for marker in ["0", "1", "9", "10", "23", "99"] {
        let text = format!("как в сноске [{marker}]");
        assert!(extract_references(&text).is_empty(), "{marker} kept");
    }
}

#[test]
fn longer_numbers_are_titles() {
    for title in ["198", "1942", "2048", "1000000"] {
        let text = format!("[{title}]");
        assert_eq!(extract_references(&text), vec![title.to_string()]);
    }
}

#[test]
fn mentions_are_dropped() {
    assert_eq!(
        extract_references("[@1234|Вася] посоветовал [Outer Wilds]"),
        vec!["Outer Wilds"]
    );
}

#[test]
fn order_and_duplicates_are_preserved() {
    assert_eq!(
        extract_references("[Hades] потом {Celeste} и снова [Hades]"),
        vec!["Hades", "Celeste", "Hades"]
    );
}

// ============================================================
// Acceptance threshold
// ============================================================

fn named(name: &str) -> CatalogGameRecord {
    CatalogGameRecord {
        name: name.to_string(),
        slug: "x".to_string(),
        ..CatalogGameRecord::default()
    }
}

#[test]
fn exactly_threshold_is_rejected() {
    // Three substitutions out of ten chars
    assert_eq!(partial_ratio("abcdefghij", "abcdefgxyz"), MATCH_THRESHOLD);
    assert!(!accepts(&named("abcdefghij"), "abcdefgxyz"));
}

#[test]
fn above_threshold_is_accepted() {
    assert_eq!(partial_ratio("abcdefghij", "abcdefghyz"), 80);
    assert!(accepts(&named("abcdefghij"), "abcdefghyz"));
}

#[test]
fn any_alternative_name_can_accept() {
    let mut record = named("Ведьмак 3: Дикая Охота");
    assert!(!accepts(&record, "The Witcher 3"));
    record.alternative_names = vec!["Witcher 3".into(), "The Witcher 3: Wild Hunt".into()];
    assert!(accepts(&record, "The Witcher 3"));
}

#[test]
fn acceptance_ignores_case() {
    assert!(accepts(&named("DOOM Eternal"), "doom eternal"));
}
