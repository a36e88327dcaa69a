// Partial-ratio similarity (0–100), substring tolerant.
//
// The shorter string is slid across the longer one, one char at a time,
// and each equally long window is scored with normalized Levenshtein
// similarity. The best window wins, so "Witcher 3" scores 100 against
// "The Witcher 3: Wild Hunt".

use strsim::normalized_levenshtein;

/// Best similarity of `a` against any equally long window of `b` (or the
/// other way round, whichever is shorter). Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0;
    }

    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };
    let short: String = short.into_iter().collect();

    let mut best = 0.0_f64;
    for window in long.windows(short.chars().count()) {
        let window: String = window.iter().collect();
        let score = normalized_levenshtein(&short, &window);
        if score > best {
            best = score;
            if best >= 1.0 {
                break;
            }
        }
    }

    (best * 100.0).round() as u8
}
