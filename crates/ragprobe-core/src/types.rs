//! Domain types shared by the indexing engine and its consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from document id (file name) to raw text. Sorted iteration gives
/// the deterministic document order the indexer relies on.
pub type Corpus = BTreeMap<String, String>;

/// A contiguous word-window extracted from one document, the retrieval unit.
///
/// - `doc_id`: identity of the source document
/// - `chunk_index`: position within the parent document, sequential from 0
/// - `text`: the non-empty text payload of the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub doc_id: String,
    pub chunk_index: usize,
    pub text: String,
}

/// One retrieval hit: a chunk plus its cosine score against the query.
///
/// Scores lie in [-1, 1] because both sides are unit-normalized and compared
/// by inner product. Higher is always better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub doc_id: String,
    pub chunk_index: usize,
    pub text: String,
    pub score: f32,
}
