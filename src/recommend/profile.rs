//! Recommendations for a demographic profile: highest mean ratings in the cohort.

use super::Recommendation;
use crate::config::check_top_n;
use crate::data::{Catalog, DestinationId, RatingTable};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Ages the profile form accepts.
pub const AGE_RANGE: RangeInclusive<u32> = 1..=120;

/// Who is asking for recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Validated but not yet used for cohort selection or weighting
    pub age: u32,
    /// Matched exactly against the rating table's gender column
    pub gender: String,
}

impl Profile {
    pub fn new(age: u32, gender: impl Into<String>) -> Self {
        Self {
            age,
            gender: gender.into(),
        }
    }
}

/// Top `top_n` destinations by mean rating among users of the profile's gender.
///
/// Unrated cells count as 0 in the mean. Ties are broken by destination id.
pub fn recommend_by_profile(
    ratings: &RatingTable,
    catalog: &Catalog,
    gender_column: &str,
    profile: &Profile,
    top_n: usize,
) -> Result<Vec<Recommendation>> {
    if !AGE_RANGE.contains(&profile.age) {
        return Err(EngineError::invalid_parameter(
            "age",
            profile.age,
            "must lie in 1..=120",
        ));
    }
    check_top_n("top_n", top_n)?;

    let gender_index = ratings.demographic_index(gender_column).ok_or_else(|| {
        EngineError::schema("ratings", format!("missing column '{}'", gender_column))
    })?;

    let cohort: Vec<&[f64]> = ratings
        .rows()
        .iter()
        .filter(|row| row.demographics[gender_index] == profile.gender)
        .map(|row| row.ratings.as_slice())
        .collect();
    if cohort.is_empty() {
        return Err(EngineError::EmptyCohort {
            gender: profile.gender.clone(),
        });
    }
    tracing::debug!(
        "Profile cohort: {} of {} users with gender '{}' (age {} not used)",
        cohort.len(),
        ratings.user_count(),
        profile.gender,
        profile.age
    );

    let size = cohort.len() as f64;
    let mut means: Vec<(DestinationId, f64)> = ratings
        .destination_ids()
        .iter()
        .enumerate()
        .map(|(column, &id)| {
            let total: f64 = cohort.iter().map(|row| row[column]).sum();
            (id, total / size)
        })
        .collect();
    means.sort_by(|(a_id, a), (b_id, b)| b.total_cmp(a).then_with(|| a_id.cmp(b_id)));

    means
        .into_iter()
        .take(top_n)
        .map(|(id, score)| {
            let destination = catalog.get(id).ok_or_else(|| {
                EngineError::schema(
                    "ratings",
                    format!("rated destination {} has no description row", id),
                )
            })?;
            Ok(Recommendation {
                name: destination.name.clone(),
                score,
            })
        })
        .collect()
}
