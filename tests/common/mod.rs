//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Each test writes its CSV sources into a fresh temporary directory, so no test
//! depends on files in the repository or on another test's state.
//!
//! # Available Fixtures
//!
//! - `dataset`: a small Banyuwangi dataset (5 destinations, 5 users) on disk
//! - `session`: a [`Session`] loaded from `dataset` with default tuning

use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tour_recommender::{EngineConfig, Session};

pub const DESCRIPTIONS: &str = "\
Id wisata,Nama Wisata,JENIS WISATA,AKSES JALAN,FASILITAS,HTM,Link Gambar
1,Pantai Boom,Pantai,Baik,\"Parkir, Toilet, Musholla, Warung Makan\",10000,https://img.example/1.jpg
2,Pantai Pulau Merah,Pantai,Sedang,\"Parkir, Toilet, Warung Makan, Penyewaan Papan Selancar\",15000,https://img.example/2.jpg
3,Kawah Ijen,Gunung,Menanjak,\"Parkir, Toilet, Pemandu Wisata, Penyewaan Masker\",5000,https://img.example/3.jpg
4,Air Terjun Tirto Kemanten,Air Terjun,Sedang,,0,https://img.example/4.jpg
5,Taman Gandrung Terakota,Budaya,Baik,Parkir; Toilet; Gazebo; Pertunjukan Tari!!,50000,https://img.example/5.jpg
";

pub const RATINGS: &str = "\
Nama,Jenis Kelamin,1,2,3,4,5
Ani,Perempuan,5,4,,2,3
Sari,Perempuan,4,5,2,,4
Budi,Laki - Laki,2,3,5,4,
Dewi,Perempuan,3,,1,5,5
Eko,Laki - Laki,,2,4,5,1
";

/// A temporary directory for test isolation.
///
/// Cleaned up automatically when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempDataset {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempDataset {
    /// Creates a temporary directory holding the default CSV sources.
    pub fn new() -> Self {
        Self::with_sources(DESCRIPTIONS, RATINGS)
    }

    /// Creates a temporary directory holding the given CSV sources.
    pub fn with_sources(descriptions: &str, ratings: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        let dataset = Self { _temp: temp, root };
        dataset.create_file("descwisata.csv", descriptions);
        dataset.create_file("ratingwisata.csv", ratings);
        dataset
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn description_path(&self) -> PathBuf {
        self.root.join("descwisata.csv")
    }

    pub fn rating_path(&self) -> PathBuf {
        self.root.join("ratingwisata.csv")
    }

    /// Creates a file with the given content within this directory.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Default config pointing at this dataset.
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            description_path: self.description_path(),
            rating_path: self.rating_path(),
            ..EngineConfig::default()
        }
    }
}

#[fixture]
pub fn dataset() -> TempDataset {
    tour_recommender::logging::init(false);
    TempDataset::new()
}

/// A session plus the directory backing it, kept alive for the test's duration.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct LoadedSession {
    pub dataset: TempDataset,
    pub session: Session,
}

#[fixture]
pub fn session(dataset: TempDataset) -> LoadedSession {
    let session = Session::load(dataset.config()).expect("fixture dataset should load");
    LoadedSession { dataset, session }
}
