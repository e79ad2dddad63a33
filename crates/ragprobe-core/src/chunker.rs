//! Sliding word-window chunking.
//!
//! Windows advance by `size_words - overlap_words` (floored to 1, so a
//! near-degenerate overlap produces extremely dense chunks rather than an
//! error). A window shorter than `max(30, size_words / 4)` words is rejected
//! and scanning stops there, so no ragged undersized tail chunk is ever
//! emitted.

/// Split `text` into overlapping word windows joined back into strings.
///
/// Returns an empty vec for whitespace-only input. Every returned chunk has
/// at most `size_words` words and at least the rejection floor.
pub fn sliding_window(text: &str, size_words: usize, overlap_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let step = size_words.saturating_sub(overlap_words).max(1);
    let floor = std::cmp::max(30, size_words / 4);

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < words.len() {
        let end = (start + size_words).min(words.len());
        if end - start < floor {
            break;
        }
        chunks.push(words[start..end].join(" "));
        if end >= words.len() {
            break;
        }
        start += step;
    }
    chunks
}
