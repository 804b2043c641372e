//! String utilities for the domain layer.

/// Truncate to at most `max_len` bytes, appending "..." when cut.
///
/// The cut always lands on a UTF-8 character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Lowercased alphanumeric words longer than three characters.
///
/// Shared by the fallback consensus heuristic and the overlap ranker so both
/// see the same vocabulary for a given response.
pub fn keywords(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() > 3)
        .map(str::to_lowercase)
}
