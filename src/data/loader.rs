//! CSV loading for the description and rating tables.

use super::types::{Catalog, Destination, DestinationId, RatingRow, RatingTable};
use crate::config::SchemaConfig;
use crate::error::{EngineError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

/// Load both tables from disk and check that every rated destination is described.
pub fn load(
    desc_source: &Path,
    rating_source: &Path,
    schema: &SchemaConfig,
) -> Result<(Catalog, RatingTable)> {
    let start = std::time::Instant::now();
    let catalog = load_descriptions(desc_source, schema)?;
    let ratings = load_ratings(rating_source, schema)?;
    check_rated_ids(&catalog, &ratings)?;

    tracing::info!(
        "Loaded {} destinations and {} users ({} rated destinations) in {:?}",
        catalog.len(),
        ratings.user_count(),
        ratings.destination_ids().len(),
        start.elapsed()
    );
    Ok((catalog, ratings))
}

pub fn load_descriptions(path: &Path, schema: &SchemaConfig) -> Result<Catalog> {
    let file = open(path)?;
    read_descriptions(file, schema).map_err(|e| attach_path(e, path))
}

pub fn load_ratings(path: &Path, schema: &SchemaConfig) -> Result<RatingTable> {
    let file = open(path)?;
    read_ratings(file, schema).map_err(|e| attach_path(e, path))
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|e| {
        tracing::error!("Failed to open {}: {}", path.display(), e);
        EngineError::data_load(path, e)
    })
}

/// Reader-level errors carry no path; fill it in once known.
fn attach_path(error: EngineError, path: &Path) -> EngineError {
    match error {
        EngineError::DataLoad { reason, .. } => EngineError::data_load(path, reason),
        EngineError::Schema { reason, .. } => {
            EngineError::schema(path.display().to_string(), reason)
        }
        other => other,
    }
}

/// Parse the description table from any CSV reader.
pub fn read_descriptions(reader: impl Read, schema: &SchemaConfig) -> Result<Catalog> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| EngineError::data_load("<descriptions>", e))?
        .clone();

    let id = find_column(&headers, &schema.id_column, "descriptions")?;
    let name = find_column(&headers, &schema.name_column, "descriptions")?;
    let category = find_column(&headers, &schema.category_column, "descriptions")?;
    let access = find_column(&headers, &schema.access_column, "descriptions")?;
    let facilities = find_column(&headers, &schema.facilities_column, "descriptions")?;
    let entry_fee = find_column(&headers, &schema.entry_fee_column, "descriptions")?;
    let image = find_column(&headers, &schema.image_column, "descriptions")?;

    let mut destinations = vec![];
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| EngineError::data_load("<descriptions>", e))?;
        let field = |index: usize| record.get(index).unwrap_or_default();

        let raw_id = field(id);
        let destination_id = parse_id(raw_id).ok_or_else(|| {
            EngineError::schema(
                "descriptions",
                format!("row {}: id '{}' is not an integer", line + 1, raw_id),
            )
        })?;

        let facilities_raw = Some(field(facilities))
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        destinations.push(Destination::new(
            destination_id,
            field(name),
            field(category),
            field(access),
            facilities_raw,
            field(entry_fee),
            field(image),
        ));
    }

    tracing::debug!("Parsed {} destination rows", destinations.len());
    Catalog::new(destinations)
}

/// Parse the rating table from any CSV reader.
///
/// The first `schema.demographic_columns` columns are kept as text; every later
/// header must be a destination id and every later cell numeric or blank.
pub fn read_ratings(reader: impl Read, schema: &SchemaConfig) -> Result<RatingTable> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| EngineError::data_load("<ratings>", e))?
        .clone();

    let prefix = schema.demographic_columns;
    if headers.len() < prefix {
        return Err(EngineError::schema(
            "ratings",
            format!(
                "expected at least {} demographic columns, found {} columns",
                prefix,
                headers.len()
            ),
        ));
    }
    find_column(&headers, &schema.gender_column, "ratings")?;

    let demographic_columns: Vec<String> = headers.iter().take(prefix).map(String::from).collect();
    let destination_ids = headers
        .iter()
        .skip(prefix)
        .map(|header| {
            parse_id(header).ok_or_else(|| {
                EngineError::schema(
                    "ratings",
                    format!("column '{}' is not a destination id", header),
                )
            })
        })
        .collect::<Result<Vec<DestinationId>>>()?;

    let mut rows = vec![];
    let mut blank_cells = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| EngineError::data_load("<ratings>", e))?;
        let demographics = record.iter().take(prefix).map(String::from).collect();

        let mut ratings = Vec::with_capacity(destination_ids.len());
        for (column, cell) in record.iter().skip(prefix).enumerate() {
            if cell.is_empty() {
                blank_cells += 1;
                ratings.push(0.0);
                continue;
            }
            let value = cell.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
                EngineError::schema(
                    "ratings",
                    format!(
                        "row {}, destination {}: '{}' is not numeric",
                        line + 1,
                        destination_ids[column],
                        cell
                    ),
                )
            })?;
            if value < 0.0 {
                return Err(EngineError::schema(
                    "ratings",
                    format!(
                        "row {}, destination {}: rating must be non-negative, found {}",
                        line + 1,
                        destination_ids[column],
                        cell
                    ),
                ));
            }
            ratings.push(value);
        }

        rows.push(RatingRow {
            demographics,
            ratings,
        });
    }

    if blank_cells > 0 {
        tracing::warn!("{} blank rating cells treated as unrated (0)", blank_cells);
    }
    RatingTable::new(demographic_columns, destination_ids, rows)
}

/// Every rated destination must have a description row.
pub(crate) fn check_rated_ids(catalog: &Catalog, ratings: &RatingTable) -> Result<()> {
    let unknown: Vec<String> = ratings
        .destination_ids()
        .iter()
        .filter(|id| !catalog.contains_id(**id))
        .map(ToString::to_string)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(EngineError::schema(
            "ratings",
            format!("rated destinations without description: {}", unknown.join(", ")),
        ))
    }
}

fn find_column(headers: &StringRecord, column: &str, source_name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| EngineError::schema(source_name, format!("missing column '{}'", column)))
}

/// Accepts `12` as well as float-formatted ids like `12.0`.
#[allow(clippy::cast_possible_truncation)]
fn parse_id(raw: &str) -> Option<DestinationId> {
    raw.parse::<DestinationId>().ok().or_else(|| {
        let value = raw.parse::<f64>().ok()?;
        (value.fract() == 0.0 && value.is_finite()).then_some(value as DestinationId)
    })
}
