//! Recommendation resolution: by visited seeds or by demographic profile.

pub(crate) mod profile;
pub(crate) mod seeds;

pub use profile::{AGE_RANGE, Profile, recommend_by_profile};
pub use seeds::{recommend, similar_destinations};

use serde::Serialize;

/// One ranked result: a destination name and its aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub score: f64,
}

impl From<Recommendation> for (String, f64) {
    fn from(recommendation: Recommendation) -> Self {
        (recommendation.name, recommendation.score)
    }
}
