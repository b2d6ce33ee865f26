//! Engine configuration: data locations, tuning weights, and table schema.
//!
//! Every field has a default matching the reference dataset, so a config file
//! only needs the keys it wants to override:
//!
//! ```toml
//! description_path = "~/data/descwisata.csv"
//! rating_path = "~/data/ratingwisata.csv"
//! alpha = 0.7
//!
//! [schema]
//! gender_column = "Gender"
//! ```

use crate::error::{EngineError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Default collaborative weight in the fused similarity.
pub const DEFAULT_ALPHA: f64 = 0.6;
/// Default TF-IDF vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 500;

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

/// Column layout of the two CSV sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub id_column: String,
    pub name_column: String,
    pub category_column: String,
    pub access_column: String,
    pub facilities_column: String,
    pub entry_fee_column: String,
    pub image_column: String,
    /// Demographic column used by profile recommendations
    pub gender_column: String,
    /// Number of leading demographic columns in the rating table; every later
    /// column is a destination id
    pub demographic_columns: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            id_column: "Id wisata".to_string(),
            name_column: "Nama Wisata".to_string(),
            category_column: "JENIS WISATA".to_string(),
            access_column: "AKSES JALAN".to_string(),
            facilities_column: "FASILITAS".to_string(),
            entry_fee_column: "HTM".to_string(),
            image_column: "Link Gambar".to_string(),
            gender_column: "Jenis Kelamin".to_string(),
            demographic_columns: 2,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub description_path: PathBuf,
    pub rating_path: PathBuf,
    /// Weight of collaborative similarity in the fused score
    pub alpha: f64,
    /// Neighbours taken from each seed before merging
    pub seed_top_n: usize,
    /// Entries returned after merging all seeds
    pub result_limit: usize,
    pub profile_top_n: usize,
    pub max_features: usize,
    /// Number of distinct alpha values whose fused matrix is kept in memory
    pub fusion_cache_capacity: usize,
    pub schema: SchemaConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            description_path: PathBuf::from("data/descwisata.csv"),
            rating_path: PathBuf::from("data/ratingwisata.csv"),
            alpha: DEFAULT_ALPHA,
            seed_top_n: 5,
            result_limit: 5,
            profile_top_n: 5,
            max_features: DEFAULT_MAX_FEATURES,
            fusion_cache_capacity: 8,
            schema: SchemaConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Read a TOML config file, expanding `~` in the data paths.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document, expanding `~` in the data paths and validating ranges.
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(raw).context("Failed to parse TOML")?;
        config.description_path = expand_path(&config.description_path);
        config.rating_path = expand_path(&config.rating_path);
        config.validate()?;
        Ok(config)
    }

    /// Reject tuning values the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)?;
        check_top_n("seed_top_n", self.seed_top_n)?;
        check_top_n("result_limit", self.result_limit)?;
        check_top_n("profile_top_n", self.profile_top_n)?;
        check_top_n("max_features", self.max_features)?;
        check_top_n("fusion_cache_capacity", self.fusion_cache_capacity)?;
        Ok(())
    }
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(&*expand_tilde(s)),
        None => path.to_path_buf(),
    }
}

/// Fusion weight must be a real number in `[0, 1]`.
pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(EngineError::invalid_parameter(
            "alpha",
            alpha,
            "must lie in [0, 1]",
        ))
    }
}

pub(crate) fn check_top_n(name: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        Err(EngineError::invalid_parameter(name, value, "must be at least 1"))
    } else {
        Ok(())
    }
}
