// Reference extraction — pulls bracketed game titles out of comment text.
//
// Commenters mark titles as `[Half-Life 2]` or `{Half-Life 2}`. Markdown
// links (`[label](url)`) use the same brackets, so they are removed first.
// Footnote markers like `[1]` and DTF mentions like `[@1234|name]` are
// dropped after extraction.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Numeric tokens shorter than this are footnote markers, not titles.
const MIN_NUMERIC_TITLE_LEN: usize = 3;

fn markdown_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[[^\[\]]+\]\([^()]+\)").expect("markdown link pattern is valid")
    })
}

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[[^\[\]]+\]|\{[^{}]+\}").expect("reference pattern is valid")
    })
}

/// Extract candidate game titles from comment text, in order of appearance.
///
/// Duplicates are kept: two different spellings may resolve to the same
/// game, so deduplication happens later by catalog slug.
pub fn extract_references(text: &str) -> Vec<String> {
    let without_links = markdown_link_re().replace_all(text, "");

    reference_re()
        .find_iter(&without_links)
        .map(|m| {
            m.as_str()
                .trim_matches(|c| matches!(c, '[' | ']' | '{' | '}'))
                .to_string()
        })
        .filter(|token| is_title_candidate(token))
        .collect()
}

fn is_title_candidate(token: &str) -> bool {
    // Inner spacing is kept as typed, so "[ 12 ]" is not a footnote
    if token.trim().is_empty() || token.starts_with('@') {
        return false;
    }
    let numeric = token.chars().all(|c| c.is_ascii_digit());
    !(numeric && token.chars().count() < MIN_NUMERIC_TITLE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_brackets() {
        assert_eq!(
            extract_references("играл в [Half-Life 2] вчера"),
            vec!["Half-Life 2"]
        );
    }

    #[test]
    fn test_curly_braces_and_order() {
        assert_eq!(
            extract_references("{Doom} лучше чем [Quake], но хуже {Doom II}"),
            vec!["Doom", "Quake", "Doom II"]
        );
    }

    #[test]
    fn test_markdown_link_label_is_not_a_reference() {
        let refs = extract_references("см. [обзор](https://dtf.ru/games/1) и [Portal]");
        assert_eq!(refs, vec!["Portal"]);
    }

    #[test]
    fn test_short_numeric_tokens_dropped() {
        assert!(extract_references("[1] и [23] это ссылки, а не игры").is_empty());
    }

    #[test]
    fn test_long_numeric_tokens_kept() {
        assert_eq!(extract_references("[1942] и [2048]"), vec!["1942", "2048"]);
    }

    #[test]
    fn test_mentions_dropped() {
        assert_eq!(
            extract_references("[@1234|Вася] поиграй в [Celeste]"),
            vec!["Celeste"]
        );
    }

    #[test]
    fn test_duplicates_preserved() {
        assert_eq!(
            extract_references("[Hades] и снова [Hades]"),
            vec!["Hades", "Hades"]
        );
    }

    #[test]
    fn test_nested_brackets_take_innermost() {
        assert_eq!(extract_references("[[Inside]]"), vec!["Inside"]);
    }

    #[test]
    fn test_inner_spacing_is_kept() {
        assert_eq!(extract_references("[ 12 ] и [ Celeste]"), vec![" 12 ", " Celeste"]);
    }

    #[test]
    fn test_blank_brackets_dropped() {
        assert!(extract_references("[ ] и {   }").is_empty());
    }

    #[test]
    fn test_no_references() {
        assert!(extract_references("просто текст без скобок").is_empty());
        assert!(extract_references("").is_empty());
    }
}
