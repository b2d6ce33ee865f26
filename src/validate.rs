//! Input validation at the resolver boundary.

use crate::data::{Catalog, Destination};
use crate::error::{EngineError, Result};
use rapidfuzz::distance::jaro_winkler;

/// Suggestions below this Jaro-Winkler similarity are not worth showing.
const SUGGESTION_THRESHOLD: f64 = 0.8;
const MAX_SUGGESTIONS: usize = 3;

/// Resolve a destination by exact display name.
///
/// Unknown names fail with [`EngineError::UnknownDestination`] carrying the
/// closest catalog names as suggestions.
pub fn validate_destination<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a Destination> {
    catalog.by_name(name).ok_or_else(|| {
        tracing::debug!("Unknown destination '{}'", name);
        EngineError::UnknownDestination {
            name: name.to_string(),
            suggestions: suggest(catalog, name),
        }
    })
}

/// Catalog names closest to `name`, best first.
pub(crate) fn suggest(catalog: &Catalog, name: &str) -> Vec<String> {
    let query = name.to_lowercase();
    let mut scored: Vec<(f64, &str)> = catalog
        .names()
        .map(|candidate| {
            let score =
                jaro_winkler::similarity(query.chars(), candidate.to_lowercase().chars());
            (score, candidate)
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|(a, a_name), (b, b_name)| b.total_cmp(a).then_with(|| a_name.cmp(b_name)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
