// Webhook secret check.

/// Compare the supplied secret with the configured one.
///
/// An empty configured secret matches nothing.
pub fn secret_matches(expected: &str, provided: Option<&str>) -> bool {
    match provided {
        Some(provided) if !expected.is_empty() => constant_time_eq(provided, expected),
        _ => false,
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
