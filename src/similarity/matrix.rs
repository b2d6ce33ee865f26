//! Dense, id-indexed similarity matrix and cosine similarity.

use crate::data::DestinationId;
use crate::error::{EngineError, Result};
use ahash::AHashMap;

/// Cosine similarity of two equal-length vectors.
///
/// A zero vector is orthogonal to everything, so the result is 0 rather than NaN.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (norm_a * norm_b)).min(1.0)
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Square, symmetric destination-to-destination similarity, stored row-major.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    ids: Vec<DestinationId>,
    positions: AHashMap<DestinationId, usize>,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Pairwise cosine similarity between one vector per destination.
    ///
    /// Non-zero vectors get an exact 1 on the diagonal; zero vectors get 0 everywhere.
    pub fn from_vectors(ids: Vec<DestinationId>, vectors: &[Vec<f64>]) -> Self {
        debug_assert_eq!(ids.len(), vectors.len());
        let n = ids.len();
        let norms: Vec<f64> = vectors.iter().map(|v| norm(v)).collect();
        let mut values = vec![0.0; n * n];

        for i in 0..n {
            if norms[i] == 0.0 {
                continue;
            }
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                if norms[j] == 0.0 {
                    continue;
                }
                let score = (dot(&vectors[i], &vectors[j]) / (norms[i] * norms[j])).clamp(0.0, 1.0);
                values[i * n + j] = score;
                values[j * n + i] = score;
            }
        }

        let zero_vectors = norms.iter().filter(|&&n| n == 0.0).count();
        if zero_vectors > 0 {
            tracing::debug!(
                "{} of {} destinations have a zero vector; their similarities are 0",
                zero_vectors,
                n
            );
        }

        Self::from_parts(ids, values)
    }

    /// Build a matrix from explicit rows, e.g. a precomputed similarity table.
    pub fn from_rows(ids: Vec<DestinationId>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = ids.len();
        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            return Err(EngineError::ShapeMismatch {
                left: n,
                right: rows.len(),
                missing: rows.iter().filter(|row| row.len() != n).count(),
            });
        }
        let mut positions = AHashMap::with_capacity(n);
        for (index, id) in ids.iter().enumerate() {
            if positions.insert(*id, index).is_some() {
                return Err(EngineError::schema(
                    "similarity",
                    format!("duplicate destination id {}", id),
                ));
            }
        }
        Ok(Self {
            ids,
            positions,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub(crate) fn from_parts(ids: Vec<DestinationId>, values: Vec<f64>) -> Self {
        let positions = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self {
            ids,
            positions,
            values,
        }
    }

    /// Destination ids in axis order.
    pub fn ids(&self) -> &[DestinationId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn position(&self, id: DestinationId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn get(&self, a: DestinationId, b: DestinationId) -> Option<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Some(self.values[i * self.len() + j])
    }

    /// One destination's similarities to every destination, including itself.
    pub fn row(&self, id: DestinationId) -> Option<impl Iterator<Item = (DestinationId, f64)> + '_> {
        let i = self.position(id)?;
        let n = self.len();
        Some(
            self.ids
                .iter()
                .copied()
                .zip(self.values[i * n..(i + 1) * n].iter().copied()),
        )
    }

    pub(crate) fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether both matrices cover exactly the same set of destination ids.
    ///
    /// An axis with a repeated id never matches.
    pub fn same_ids(&self, other: &Self) -> bool {
        self.positions.len() == self.ids.len()
            && other.positions.len() == other.ids.len()
            && self.len() == other.len()
            && self.ids.iter().all(|id| other.positions.contains_key(id))
    }
}

/// Equal when both axes and every score match; the lookup table is derived.
impl PartialEq for SimilarityMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids && self.values == other.values
    }
}
