//! Item-based collaborative similarity from the user rating matrix.

use super::matrix::SimilarityMatrix;
use crate::data::RatingTable;

/// Cosine similarity between destination rating columns across all users.
pub fn collaborative_similarity(ratings: &RatingTable) -> SimilarityMatrix {
    let start = std::time::Instant::now();
    let ids = ratings.destination_ids().to_vec();
    let columns: Vec<Vec<f64>> = (0..ids.len())
        .map(|index| ratings.column(index).collect())
        .collect();

    let matrix = SimilarityMatrix::from_vectors(ids, &columns);
    tracing::info!(
        "Built collaborative similarity: {} destinations x {} users in {:?}",
        matrix.len(),
        ratings.user_count(),
        start.elapsed()
    );
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RatingRow;
    use assert2::{check, let_assert};

    fn table(rows: &[[f64; 3]]) -> RatingTable {
        let rows = rows
            .iter()
            .map(|ratings| RatingRow {
                demographics: vec!["u".into(), "Perempuan".into()],
                ratings: ratings.to_vec(),
            })
            .collect();
        RatingTable::new(
            vec!["Nama".into(), "Jenis Kelamin".into()],
            vec![3, 1, 2],
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_indexed_by_destination_id() {
        let matrix = collaborative_similarity(&table(&[[5.0, 5.0, 0.0], [1.0, 1.0, 2.0]]));
        check!(matrix.ids() == [3, 1, 2]);
        // columns 3 and 1 are identical
        let_assert!(Some(score) = matrix.get(3, 1));
        check!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_of_columns() {
        let matrix = collaborative_similarity(&table(&[[1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]));
        let_assert!(Some(score) = matrix.get(3, 2));
        check!((score - 1.0 / 2f64.sqrt()).abs() < 1e-12);
        check!(matrix.get(3, 1) == Some(0.0));
    }

    #[test]
    fn test_unrated_destination_is_zero_not_nan() {
        let matrix = collaborative_similarity(&table(&[[4.0, 0.0, 3.0], [2.0, 0.0, 5.0]]));
        for &other in matrix.ids() {
            check!(matrix.get(1, other) == Some(0.0));
        }
    }

    #[test]
    fn test_deterministic() {
        let ratings = table(&[[4.0, 1.0, 3.0], [2.0, 5.0, 5.0], [0.0, 3.0, 1.0]]);
        check!(collaborative_similarity(&ratings) == collaborative_similarity(&ratings));
    }
}
