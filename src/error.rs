//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Every failure the recommendation engine can surface to its caller.
///
/// Input errors (unknown names, empty selections, out-of-range parameters) are
/// user-correctable; the rest indicate a broken dataset. See [`EngineError::is_user_error`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// A data source is missing or cannot be parsed as CSV.
    #[error("failed to load {}: {reason}", path.display())]
    DataLoad { path: PathBuf, reason: String },

    /// A required column is missing, or a value is not numeric where it must be.
    #[error("schema error in {source_name}: {reason}")]
    Schema { source_name: String, reason: String },

    /// A seed name that does not match any destination.
    #[error("{}", unknown_destination_message(name, suggestions))]
    UnknownDestination {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("select at least one visited destination")]
    EmptySeedSet,

    /// No rating rows match the requested demographic filter.
    #[error("no users found with gender '{gender}'")]
    EmptyCohort { gender: String },

    #[error("invalid value for {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Two similarity matrices do not cover the same destination ids.
    #[error(
        "similarity matrices cover different destinations ({left} vs {right} ids, {missing} unmatched)"
    )]
    ShapeMismatch {
        left: usize,
        right: usize,
        missing: usize,
    },
}

impl EngineError {
    /// Whether the error stems from caller input rather than from the dataset.
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDestination { .. }
                | Self::EmptySeedSet
                | Self::EmptyCohort { .. }
                | Self::InvalidParameter { .. }
        )
    }

    pub(crate) fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn schema(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

fn unknown_destination_message(name: &str, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        format!("destination '{}' not found in dataset", name)
    } else {
        format!(
            "destination '{}' not found in dataset (did you mean: {}?)",
            name,
            suggestions.join(", ")
        )
    }
}
