//! Recommendations anchored on destinations the user already visited.

use super::Recommendation;
use crate::config::check_top_n;
use crate::data::{Catalog, DestinationId};
use crate::error::{EngineError, Result};
use crate::similarity::SimilarityMatrix;
use crate::validate::validate_destination;
use ahash::{AHashMap, AHashSet};

/// Merged recommendations for a set of visited destinations.
///
/// Each seed contributes its `top_n` nearest neighbours in `fused` (itself
/// excluded, ties by id). Scores of a destination reached from several seeds are
/// summed, the merged list is sorted by score (ties keep first-seen order), and
/// the first `result_limit` entries are returned.
///
/// Every seed is validated before any scoring, so one unknown name fails the
/// whole request. Repeated seed names count once.
pub fn recommend<S: AsRef<str>>(
    fused: &SimilarityMatrix,
    catalog: &Catalog,
    seeds: &[S],
    top_n: usize,
    result_limit: usize,
) -> Result<Vec<Recommendation>> {
    if seeds.is_empty() {
        return Err(EngineError::EmptySeedSet);
    }
    check_top_n("top_n", top_n)?;
    check_top_n("result_limit", result_limit)?;

    let mut seen = AHashSet::with_capacity(seeds.len());
    let mut seed_ids = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let destination = validate_destination(catalog, seed.as_ref())?;
        if seen.insert(destination.id) {
            seed_ids.push(destination.id);
        }
    }

    let mut merged: Vec<Recommendation> = vec![];
    let mut slots: AHashMap<DestinationId, usize> = AHashMap::new();
    for seed_id in &seed_ids {
        for (id, score) in neighbours(fused, *seed_id, top_n)? {
            if let Some(&slot) = slots.get(&id) {
                merged[slot].score += score;
            } else {
                slots.insert(id, merged.len());
                merged.push(Recommendation {
                    name: destination_name(catalog, id)?,
                    score,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal scores
    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.truncate(result_limit);

    tracing::debug!(
        "Recommended {} destinations from {} seeds (top_n={})",
        merged.len(),
        seed_ids.len(),
        top_n
    );
    Ok(merged)
}

/// The `k` destinations most similar to one destination, best first.
pub fn similar_destinations(
    fused: &SimilarityMatrix,
    catalog: &Catalog,
    name: &str,
    k: usize,
) -> Result<Vec<Recommendation>> {
    check_top_n("k", k)?;
    let destination = validate_destination(catalog, name)?;
    neighbours(fused, destination.id, k)?
        .into_iter()
        .map(|(id, score)| {
            Ok(Recommendation {
                name: destination_name(catalog, id)?,
                score,
            })
        })
        .collect()
}

/// Highest-scoring row entries of `seed`, excluding itself; ties by id ascending.
fn neighbours(
    fused: &SimilarityMatrix,
    seed: DestinationId,
    top_n: usize,
) -> Result<Vec<(DestinationId, f64)>> {
    // Seeds come from the catalog, and fusion only succeeds when the matrix
    // covers exactly the catalog's ids
    debug_assert!(fused.position(seed).is_some());
    let row = fused.row(seed).ok_or_else(|| {
        EngineError::schema(
            "similarity",
            format!(
                "destination {} is in the catalog but not in the fused matrix; \
                 the matrix must cover every described destination",
                seed
            ),
        )
    })?;
    let mut scores: Vec<(DestinationId, f64)> = row.filter(|(id, _)| *id != seed).collect();
    scores.sort_by(|(a_id, a), (b_id, b)| b.total_cmp(a).then_with(|| a_id.cmp(b_id)));
    scores.truncate(top_n);
    Ok(scores)
}

fn destination_name(catalog: &Catalog, id: DestinationId) -> Result<String> {
    catalog.get(id).map(|d| d.name.clone()).ok_or_else(|| {
        EngineError::schema(
            "similarity",
            format!("destination {} has no description row", id),
        )
    })
}
