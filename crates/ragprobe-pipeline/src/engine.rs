use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use ragprobe_core::chunker::sliding_window;
use ragprobe_core::error::Error;
use ragprobe_core::traits::Embedder;
use ragprobe_core::types::{Chunk, Corpus, RetrievedChunk};
use ragprobe_extract::{detect_question_type, extract_short_answer};
use ragprobe_vector::{dot, l2_normalize, FlatIpIndex};

use crate::select::split_sentences;

const EMBED_BATCH: usize = 64;

/// A fully constructed index: the chunk list and its parallel vector store.
/// The i-th vector always corresponds to the i-th chunk.
struct BuiltIndex {
    chunks: Vec<Chunk>,
    vectors: FlatIpIndex,
}

pub struct RagEngine {
    embedder: Box<dyn Embedder>,
    built: Option<BuiltIndex>,
}

impl RagEngine {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self { embedder, built: None }
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Number of chunks in the current index; 0 when no index is built.
    pub fn chunk_count(&self) -> usize {
        self.built.as_ref().map_or(0, |b| b.chunks.len())
    }

    /// Chunk every document, embed the chunks in bulk, and load them into a
    /// fresh index. The new index replaces the old one only after it is
    /// fully constructed; any failure leaves the previous index untouched.
    pub fn build_index(
        &mut self,
        docs: &Corpus,
        size_words: usize,
        overlap_words: usize,
    ) -> Result<()> {
        let mut all_chunks: Vec<Chunk> = Vec::new();
        for (doc_id, text) in docs {
            let pieces = sliding_window(text, size_words, overlap_words);
            for (i, piece) in pieces.into_iter().enumerate() {
                all_chunks.push(Chunk {
                    doc_id: doc_id.clone(),
                    chunk_index: i,
                    text: piece,
                });
            }
        }
        if all_chunks.is_empty() {
            return Err(Error::InvalidConfig(
                "No chunks created. Check your documents / chunking params.".to_string(),
            )
            .into());
        }

        let embeddings = self.embed_chunk_texts(&all_chunks)?;
        let dim = embeddings[0].len();
        let mut vectors = FlatIpIndex::new(dim)?;
        vectors.add(&embeddings)?;

        tracing::info!(chunks = all_chunks.len(), dim, "index built");
        self.built = Some(BuiltIndex { chunks: all_chunks, vectors });
        Ok(())
    }

    fn embed_chunk_texts(&self, chunks: &[Chunk]) -> Result<Vec<Vec<f32>>> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let pb = ProgressBar::new(texts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")?
                .progress_chars("#>-"),
        );
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH) {
            let mut embs = self.embedder.embed_batch(batch)?;
            for e in &mut embs {
                l2_normalize(e);
            }
            embeddings.append(&mut embs);
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();
        Ok(embeddings)
    }

    /// Top-k retrieval over the current index. Sentinel slots from an
    /// underfull index are dropped, so the result length is at most
    /// `min(top_k, chunk_count)`.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let built = self.built.as_ref().ok_or(Error::IndexNotBuilt)?;

        let q = self.embed_one(query)?;
        let (ids, scores) = built.vectors.search(&q, top_k)?;

        let mut results = Vec::new();
        for (id, score) in ids.into_iter().zip(scores) {
            if id < 0 {
                continue;
            }
            let chunk = &built.chunks[id as usize];
            results.push(RetrievedChunk {
                doc_id: chunk.doc_id.clone(),
                chunk_index: chunk.chunk_index,
                text: chunk.text.clone(),
                score,
            });
        }
        tracing::debug!(query, hits = results.len(), "retrieved");
        Ok(results)
    }

    /// Answer a query from already-retrieved chunks: choose the first chunk
    /// at or above `min_score` (first overall when none qualifies), select
    /// its best sentence, and run the type-conditioned extractor. Returns
    /// the answer and a diagnostic report listing the full retrieval.
    pub fn answer(
        &self,
        query: &str,
        retrieved: &[RetrievedChunk],
        min_score: f32,
    ) -> Result<(String, String)> {
        if retrieved.is_empty() {
            return Ok((String::new(), "Retrieved Context: (none)".to_string()));
        }

        let chosen = retrieved
            .iter()
            .find(|r| r.score >= min_score)
            .unwrap_or(&retrieved[0]);

        let best_sentence = self.best_sentence(query, &chosen.text)?;
        let qtype = detect_question_type(query);
        let answer = extract_short_answer(&best_sentence, qtype, query);
        let report = render_report(retrieved, &best_sentence);
        Ok((answer, report))
    }

    /// Stable argmax of cosine similarity between the query and each
    /// candidate sentence; the first highest-scoring candidate wins.
    fn best_sentence(&self, query: &str, chunk_text: &str) -> Result<String> {
        let mut sentences = split_sentences(chunk_text);
        let q = self.embed_one(query)?;
        let mut embs = self.embedder.embed_batch(&sentences)?;
        for e in &mut embs {
            l2_normalize(e);
        }

        let mut best = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for (i, e) in embs.iter().enumerate() {
            let score = dot(&q, e);
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        Ok(sentences.swap_remove(best))
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = self
            .embedder
            .embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))?;
        l2_normalize(&mut v);
        Ok(v)
    }
}

fn render_report(retrieved: &[RetrievedChunk], chosen_sentence: &str) -> String {
    let context = retrieved
        .iter()
        .map(|r| format!("[{}#{} | score={:.3}]\n{}", r.doc_id, r.chunk_index, r.score, r.text))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Retrieved Context:\n{context}\n\nChosen sentence: {chosen_sentence}")
}
