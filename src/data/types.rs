//! In-memory tables: the destination catalog and the user rating matrix.

use crate::error::{EngineError, Result};
use crate::text::normalize;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;

/// Integer destination identifier shared by both tables.
pub type DestinationId = i64;

/// One row of the description table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    pub category: String,
    pub access: String,
    pub facilities_raw: Option<String>,
    /// `facilities_raw` after [`normalize`]
    pub facilities_normalized: String,
    pub entry_fee: String,
    pub image_ref: String,
}

impl Destination {
    pub fn new(
        id: DestinationId,
        name: impl Into<String>,
        category: impl Into<String>,
        access: impl Into<String>,
        facilities_raw: Option<String>,
        entry_fee: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        let facilities_normalized = normalize(facilities_raw.as_deref());
        Self {
            id,
            name: name.into(),
            category: category.into(),
            access: access.into(),
            facilities_raw,
            facilities_normalized,
            entry_fee: entry_fee.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// All destinations, in source order, with id and name lookups.
#[derive(Debug, Clone)]
pub struct Catalog {
    destinations: Vec<Destination>,
    by_id: AHashMap<DestinationId, usize>,
    by_name: AHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids or names.
    pub fn new(destinations: Vec<Destination>) -> Result<Self> {
        let mut by_id = AHashMap::with_capacity(destinations.len());
        let mut by_name = AHashMap::with_capacity(destinations.len());

        for (index, destination) in destinations.iter().enumerate() {
            if by_id.insert(destination.id, index).is_some() {
                return Err(EngineError::schema(
                    "descriptions",
                    format!("duplicate destination id {}", destination.id),
                ));
            }
            if by_name.insert(destination.name.clone(), index).is_some() {
                return Err(EngineError::schema(
                    "descriptions",
                    format!("duplicate destination name '{}'", destination.name),
                ));
            }
        }

        Ok(Self {
            destinations,
            by_id,
            by_name,
        })
    }

    pub fn get(&self, id: DestinationId) -> Option<&Destination> {
        self.by_id.get(&id).map(|&index| &self.destinations[index])
    }

    pub fn by_name(&self, name: &str) -> Option<&Destination> {
        self.by_name.get(name).map(|&index| &self.destinations[index])
    }

    pub fn contains_id(&self, id: DestinationId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Destinations in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.destinations.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

/// One user's row: demographic values followed by per-destination ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub demographics: Vec<String>,
    /// Aligned with [`RatingTable::destination_ids`]; unrated cells are 0
    pub ratings: Vec<f64>,
}

/// The user rating matrix with its demographic prefix.
#[derive(Debug, Clone)]
pub struct RatingTable {
    demographic_columns: Vec<String>,
    destination_ids: Vec<DestinationId>,
    rows: Vec<RatingRow>,
}

impl RatingTable {
    /// Build a table, checking that every row has the declared width.
    ///
    /// Each destination id may head only one column, and ratings must be
    /// non-negative so that cosine similarities stay within `[0, 1]`.
    pub fn new(
        demographic_columns: Vec<String>,
        destination_ids: Vec<DestinationId>,
        rows: Vec<RatingRow>,
    ) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(destination_ids.len());
        if let Some(id) = destination_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(EngineError::schema(
                "ratings",
                format!("duplicate rating column for destination {}", id),
            ));
        }

        for (line, row) in rows.iter().enumerate() {
            if row.demographics.len() != demographic_columns.len()
                || row.ratings.len() != destination_ids.len()
            {
                return Err(EngineError::schema(
                    "ratings",
                    format!(
                        "row {} has {} demographic and {} rating values, expected {} and {}",
                        line + 1,
                        row.demographics.len(),
                        row.ratings.len(),
                        demographic_columns.len(),
                        destination_ids.len()
                    ),
                ));
            }
            if let Some(column) = row.ratings.iter().position(|v| *v < 0.0 || !v.is_finite()) {
                return Err(EngineError::schema(
                    "ratings",
                    format!(
                        "row {}, destination {}: rating must be non-negative",
                        line + 1,
                        destination_ids[column]
                    ),
                ));
            }
        }

        Ok(Self {
            demographic_columns,
            destination_ids,
            rows,
        })
    }

    pub fn demographic_columns(&self) -> &[String] {
        &self.demographic_columns
    }

    /// Destination ids in rating-column order.
    pub fn destination_ids(&self) -> &[DestinationId] {
        &self.destination_ids
    }

    pub fn rows(&self) -> &[RatingRow] {
        &self.rows
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a demographic column by header name.
    pub fn demographic_index(&self, column: &str) -> Option<usize> {
        self.demographic_columns.iter().position(|c| c == column)
    }

    /// Ratings of one destination across all users.
    pub(crate) fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row.ratings[index])
    }
}
