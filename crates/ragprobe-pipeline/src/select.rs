//! Sentence candidate splitting for within-chunk selection.

use std::sync::LazyLock;

use regex::Regex;

// A sentence boundary is terminal punctuation followed by whitespace. The
// split point sits after the punctuation so candidates keep it.
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex is valid"));

/// Split chunk text into candidate sentences.
///
/// Lines are split first so headline-style lines without terminal punctuation
/// stay separate units; each line is then split at sentence boundaries. Empty
/// pieces are dropped. If nothing survives, the whole trimmed text is the
/// single candidate, so the result is never empty.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut start = 0usize;
        for m in SENTENCE_BOUNDARY.find_iter(line) {
            let cut = m.start() + 1;
            let piece = line[start..cut].trim();
            if !piece.is_empty() {
                sentences.push(piece.to_string());
            }
            start = m.end();
        }
        let tail = line[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
    }

    if sentences.is_empty() {
        return vec![text.trim().to_string()];
    }
    sentences
}
