//! Content similarity from TF-IDF weighted facility text.

use super::matrix::{SimilarityMatrix, norm};
use crate::data::{Catalog, DestinationId};
use crate::text::tokenize::term_counts;
use ahash::AHashMap;
use std::cmp::Ordering;

/// TF-IDF weights of every destination's normalized facility text.
///
/// The vocabulary keeps the `max_features` terms with the highest frequency
/// across the corpus (ties by term). Weights use raw term counts and the
/// smoothed inverse document frequency `ln((1 + n) / (1 + df)) + 1`, and each
/// destination vector is scaled to unit length. Destinations whose text has no
/// vocabulary term keep a zero vector.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    ids: Vec<DestinationId>,
    /// Vocabulary in column order (alphabetical)
    vocabulary: Vec<String>,
    /// Total occurrences of each vocabulary term across all destinations
    corpus_counts: Vec<usize>,
    idf: Vec<f64>,
    vectors: Vec<Vec<f64>>,
}

impl TfidfModel {
    pub fn fit(catalog: &Catalog, max_features: usize) -> Self {
        let start = std::time::Instant::now();
        let ids: Vec<DestinationId> = catalog.iter().map(|d| d.id).collect();
        let documents: Vec<AHashMap<&str, usize>> = catalog
            .iter()
            .map(|d| term_counts(&d.facilities_normalized))
            .collect();

        let mut corpus: AHashMap<&str, usize> = AHashMap::new();
        for counts in &documents {
            for (term, count) in counts {
                *corpus.entry(*term).or_insert(0) += count;
            }
        }

        let mut ranked: Vec<(&str, usize)> = corpus.into_iter().collect();
        ranked.sort_by(|(a_term, a_count), (b_term, b_count)| {
            b_count.cmp(a_count).then_with(|| a_term.cmp(b_term))
        });
        let dropped = ranked.len().saturating_sub(max_features);
        ranked.truncate(max_features);
        ranked.sort_by(|(a, _), (b, _)| a.cmp(b));

        let columns: AHashMap<&str, usize> = ranked
            .iter()
            .enumerate()
            .map(|(column, (term, _))| (*term, column))
            .collect();

        let mut document_frequency = vec![0usize; ranked.len()];
        for counts in &documents {
            for term in counts.keys() {
                if let Some(&column) = columns.get(term) {
                    document_frequency[column] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors: Vec<Vec<f64>> = documents
            .iter()
            .map(|counts| {
                let mut vector = vec![0.0; ranked.len()];
                for (term, &count) in counts {
                    if let Some(&column) = columns.get(term) {
                        vector[column] = count as f64 * idf[column];
                    }
                }
                let length = norm(&vector);
                if length > 0.0 {
                    vector.iter_mut().for_each(|w| *w /= length);
                }
                vector
            })
            .collect();

        tracing::info!(
            "Built TF-IDF model: {} terms ({} dropped by cap), {} destinations in {:?}",
            ranked.len(),
            dropped,
            ids.len(),
            start.elapsed()
        );

        Self {
            ids,
            vocabulary: ranked.iter().map(|(term, _)| (*term).to_string()).collect(),
            corpus_counts: ranked.iter().map(|(_, count)| *count).collect(),
            idf,
            vectors,
        }
    }

    /// Vocabulary terms in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.column(term).map(|column| self.idf[column])
    }

    /// The `k` most frequent vocabulary terms across all facility descriptions.
    pub fn top_terms(&self, k: usize) -> Vec<&str> {
        let mut columns: Vec<usize> = (0..self.vocabulary.len()).collect();
        columns.sort_by(|&a, &b| {
            self.corpus_counts[b]
                .cmp(&self.corpus_counts[a])
                .then_with(|| self.vocabulary[a].cmp(&self.vocabulary[b]))
        });
        columns
            .into_iter()
            .take(k)
            .map(|column| self.vocabulary[column].as_str())
            .collect()
    }

    /// The `k` highest-weighted terms of one destination, heaviest first.
    ///
    /// Weights come from this model's full vocabulary (`max_features` terms), so
    /// they differ from a model fitted with only `k` features: each row is
    /// L2-normalized over every vocabulary term, and terms outside the corpus-wide
    /// top `k` can still rank. Use [`TfidfModel::fit`] with `max_features = k` for
    /// weights restricted to the `k` most frequent terms.
    ///
    /// Returns `None` for an unknown id and an empty list for empty facility text.
    pub fn keywords(&self, id: DestinationId, k: usize) -> Option<Vec<(&str, f64)>> {
        let index = self.ids.iter().position(|&candidate| candidate == id)?;
        let mut weighted: Vec<(&str, f64)> = self.vectors[index]
            .iter()
            .enumerate()
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(column, weight)| (self.vocabulary[column].as_str(), *weight))
            .collect();
        weighted.sort_by(|(a_term, a), (b_term, b)| {
            b.partial_cmp(a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a_term.cmp(b_term))
        });
        weighted.truncate(k);
        Some(weighted)
    }

    /// Pairwise cosine similarity of the destination vectors.
    pub fn similarity(&self) -> SimilarityMatrix {
        SimilarityMatrix::from_vectors(self.ids.clone(), &self.vectors)
    }

    fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|candidate| candidate.as_str().cmp(term))
            .ok()
    }
}

/// Content similarity matrix over all catalog destinations.
pub fn content_similarity(catalog: &Catalog, max_features: usize) -> SimilarityMatrix {
    TfidfModel::fit(catalog, max_features).similarity()
}
