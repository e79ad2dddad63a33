//! In-memory exact nearest-neighbor index over inner product.
//!
//! Vectors are expected to be unit-normalized, so inner product equals cosine
//! similarity. The index is flat: every query scans every stored row. When
//! fewer than `k` rows exist, the result is padded to length `k` with the
//! sentinel id `-1`; callers filter those slots out.

use anyhow::{anyhow, Result};

/// Sentinel id marking a padded "no match" slot in underfull search results.
pub const NO_MATCH: i64 = -1;

pub struct FlatIpIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(anyhow!("index dimension must be positive"));
        }
        Ok(Self { dim, data: Vec::new() })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append vectors to the index. Every vector must match the index
    /// dimension; on a mismatch nothing is added.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        for v in vectors {
            if v.len() != self.dim {
                return Err(anyhow!(
                    "vector dimension {} does not match index dimension {}",
                    v.len(),
                    self.dim
                ));
            }
        }
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    /// Exact top-`k` search by inner product.
    ///
    /// Returns parallel `(ids, scores)` of length exactly `k`; slots beyond
    /// the stored row count carry [`NO_MATCH`] and a negative-infinity score.
    pub fn search(&self, query: &[f32], k: usize) -> Result<(Vec<i64>, Vec<f32>)> {
        if query.len() != self.dim {
            return Err(anyhow!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dim
            ));
        }

        let mut scored: Vec<(i64, f32)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(i, row)| (i as i64, dot(query, row)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);

        let mut ids: Vec<i64> = scored.iter().map(|(i, _)| *i).collect();
        let mut scores: Vec<f32> = scored.iter().map(|(_, s)| *s).collect();
        while ids.len() < k {
            ids.push(NO_MATCH);
            scores.push(f32::NEG_INFINITY);
        }
        Ok((ids, scores))
    }
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scale `v` to unit L2 norm in place. A zero vector is left unchanged via
/// the epsilon guard.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
    for x in v.iter_mut() {
        *x /= norm;
    }
}
