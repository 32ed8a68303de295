//! Canonical comparable form of a text span

/// Lowercase, replace punctuation with spaces, collapse whitespace, trim.
///
/// Word characters (alphanumerics and `_`) and whitespace are kept; every
/// other character becomes a space. Total and deterministic.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
