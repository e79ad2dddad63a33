//! The retrieval-and-extraction engine.
//!
//! `RagEngine` owns an embedder and the current index, and exposes the three
//! operations consumers call: build an index from a corpus, retrieve top-k
//! chunks for a query, and extract a short answer from retrieved chunks.

pub mod engine;
pub mod select;

pub use engine::RagEngine;
