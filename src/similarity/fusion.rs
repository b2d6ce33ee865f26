//! Weighted fusion of collaborative and content similarity.

use super::matrix::SimilarityMatrix;
use crate::config::check_alpha;
use crate::error::{EngineError, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

/// `alpha * collab + (1 - alpha) * content`, laid out on `collab`'s id order.
///
/// Both inputs must cover the same destination ids, in any order.
pub fn fuse(
    collab: &SimilarityMatrix,
    content: &SimilarityMatrix,
    alpha: f64,
) -> Result<SimilarityMatrix> {
    check_alpha(alpha)?;
    if !collab.same_ids(content) {
        let missing = collab
            .ids()
            .iter()
            .filter(|id| content.position(**id).is_none())
            .count()
            + content
                .ids()
                .iter()
                .filter(|id| collab.position(**id).is_none())
                .count();
        tracing::warn!(
            "Cannot fuse similarity matrices: {} vs {} destinations, {} unmatched",
            collab.len(),
            content.len(),
            missing
        );
        return Err(EngineError::ShapeMismatch {
            left: collab.len(),
            right: content.len(),
            missing,
        });
    }

    let ids = collab.ids();
    // Column positions of collab's ids inside the content matrix
    let mapping: Vec<usize> = ids
        .iter()
        .filter_map(|id| content.position(*id))
        .collect();

    let n = ids.len();
    let collab_values = collab.values();
    let content_values = content.values();
    let mut values = Vec::with_capacity(n * n);
    for (i, &ci) in mapping.iter().enumerate() {
        for (j, &cj) in mapping.iter().enumerate() {
            let cf = collab_values[i * n + j];
            let cb = content_values[ci * n + cj];
            values.push(alpha.mul_add(cf, (1.0 - alpha) * cb));
        }
    }

    Ok(SimilarityMatrix::from_parts(ids.to_vec(), values))
}

/// Fused matrices memoized per alpha over a fixed pair of inputs.
///
/// Inputs never change, so a cached matrix stays valid for the cache's lifetime.
#[derive(Debug)]
pub struct FusionCache {
    collab: Arc<SimilarityMatrix>,
    content: Arc<SimilarityMatrix>,
    fused: Mutex<LruCache<u64, Arc<SimilarityMatrix>>>,
}

impl FusionCache {
    pub fn new(
        collab: Arc<SimilarityMatrix>,
        content: Arc<SimilarityMatrix>,
        capacity: NonZeroUsize,
    ) -> Self {
        Self {
            collab,
            content,
            fused: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn collaborative(&self) -> &SimilarityMatrix {
        &self.collab
    }

    pub fn content(&self) -> &SimilarityMatrix {
        &self.content
    }

    /// The fused matrix for `alpha`, computed on first use.
    pub fn get(&self, alpha: f64) -> Result<Arc<SimilarityMatrix>> {
        check_alpha(alpha)?;
        // -0.0 and 0.0 fuse identically
        let key = (alpha + 0.0).to_bits();

        if let Some(hit) = self.lock().get(&key) {
            tracing::trace!("Fusion cache hit for alpha={}", alpha);
            return Ok(Arc::clone(hit));
        }

        let start = std::time::Instant::now();
        let fused = Arc::new(fuse(&self.collab, &self.content, alpha)?);
        tracing::debug!(
            "Fused {} destinations at alpha={} in {:?}",
            fused.len(),
            alpha,
            start.elapsed()
        );
        self.lock().put(key, Arc::clone(&fused));
        Ok(fused)
    }

    /// Number of alpha values currently memoized.
    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<u64, Arc<SimilarityMatrix>>> {
        // The cache holds only finished matrices, so a poisoned lock is still consistent
        self.fused.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
