//! Flat (exact) L2 nearest-neighbor index.

use crate::error::{DagbokError, Result};
use serde::{Deserialize, Serialize};

/// Exact nearest-neighbor index under squared L2 distance.
///
/// Brute-force over all stored vectors. Exact search keeps retrieval
/// reproducible, which matters more than speed at journal-sized corpora.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create an empty index for vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: Vec::new(),
        }
    }

    /// Append a vector. Its position is the next insertion index.
    pub fn add(&mut self, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(DagbokError::Index(format!(
                "Expected {} dimensions, got {}",
                self.dimensions,
                vector.len()
            )));
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector dimensionality.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the `min(k, len)` nearest vectors to `query`.
    ///
    /// Results are `(position, squared L2 distance)` pairs, nearest first.
    /// Ties are broken by the lowest insertion position, so retrieval is
    /// deterministic for identical distances. An empty index yields an empty
    /// result.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, l2_squared(query, v)))
            .collect();

        // Stable sort preserves insertion order among equal distances.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

/// Squared Euclidean distance between two vectors.
fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
