/// Normalize text for exact-match comparison: lowercase, strip punctuation,
/// collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
