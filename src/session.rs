//! Session context: tables and similarity matrices built once, shared read-only.

use crate::config::EngineConfig;
use crate::data::{self, Catalog, Destination, RatingTable};
use crate::error::{EngineError, Result};
use crate::recommend::{self, Profile, Recommendation};
use crate::similarity::{
    FusionCache, SimilarityMatrix, TfidfModel, collaborative_similarity,
};
use crate::validate::validate_destination;
use std::num::NonZeroUsize;
use std::sync::{Arc, PoisonError, RwLock};

/// Everything a recommendation request needs, computed once at startup.
///
/// Immutable after construction apart from the per-alpha fusion memo, so a
/// `Session` can be shared across threads behind an `Arc` without locking.
#[derive(Debug)]
pub struct Session {
    config: EngineConfig,
    catalog: Catalog,
    ratings: RatingTable,
    tfidf: TfidfModel,
    fusion: FusionCache,
}

impl Session {
    /// Load both tables from the configured paths and build all matrices.
    pub fn load(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let (catalog, ratings) = data::load(
            &config.description_path,
            &config.rating_path,
            &config.schema,
        )?;
        Self::from_tables(config, catalog, ratings)
    }

    /// Build a session over already-loaded tables.
    ///
    /// Fuses once at the configured alpha so that mismatched tables fail here
    /// rather than on the first request.
    pub fn from_tables(config: EngineConfig, catalog: Catalog, ratings: RatingTable) -> Result<Self> {
        config.validate()?;
        data::loader::check_rated_ids(&catalog, &ratings)?;
        let start = std::time::Instant::now();

        let collab = collaborative_similarity(&ratings);
        let tfidf = TfidfModel::fit(&catalog, config.max_features);
        let content = tfidf.similarity();

        let capacity = NonZeroUsize::new(config.fusion_cache_capacity).ok_or_else(|| {
            EngineError::invalid_parameter("fusion_cache_capacity", 0, "must be at least 1")
        })?;
        let fusion = FusionCache::new(Arc::new(collab), Arc::new(content), capacity);
        fusion.get(config.alpha)?;

        tracing::info!(
            "Session ready: {} destinations, {} users, alpha={} in {:?}",
            catalog.len(),
            ratings.user_count(),
            config.alpha,
            start.elapsed()
        );

        Ok(Self {
            config,
            catalog,
            ratings,
            tfidf,
            fusion,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }

    pub fn tfidf(&self) -> &TfidfModel {
        &self.tfidf
    }

    /// All destinations in source order, for listing pages.
    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.catalog.iter()
    }

    pub fn collaborative(&self) -> &SimilarityMatrix {
        self.fusion.collaborative()
    }

    pub fn content(&self) -> &SimilarityMatrix {
        self.fusion.content()
    }

    /// The fused matrix for `alpha`, memoized.
    pub fn fused(&self, alpha: f64) -> Result<Arc<SimilarityMatrix>> {
        self.fusion.get(alpha)
    }

    /// Merged recommendations for visited destinations at an explicit weight.
    pub fn recommend<S: AsRef<str>>(
        &self,
        seeds: &[S],
        top_n: usize,
        alpha: f64,
    ) -> Result<Vec<Recommendation>> {
        if seeds.is_empty() {
            return Err(EngineError::EmptySeedSet);
        }
        let fused = self.fused(alpha)?;
        recommend::recommend(&fused, &self.catalog, seeds, top_n, self.config.result_limit)
    }

    /// [`Session::recommend`] with the configured per-seed fan-out and alpha.
    pub fn recommend_default<S: AsRef<str>>(&self, seeds: &[S]) -> Result<Vec<Recommendation>> {
        self.recommend(seeds, self.config.seed_top_n, self.config.alpha)
    }

    pub fn recommend_by_profile(
        &self,
        age: u32,
        gender: &str,
        top_n: usize,
    ) -> Result<Vec<Recommendation>> {
        recommend::recommend_by_profile(
            &self.ratings,
            &self.catalog,
            &self.config.schema.gender_column,
            &Profile::new(age, gender),
            top_n,
        )
    }

    /// The `k` nearest destinations to one destination at the configured alpha.
    pub fn similar_destinations(&self, name: &str, k: usize) -> Result<Vec<Recommendation>> {
        let fused = self.fused(self.config.alpha)?;
        recommend::similar_destinations(&fused, &self.catalog, name, k)
    }

    /// Most frequent facility terms across all destinations.
    pub fn top_terms(&self, k: usize) -> Vec<&str> {
        self.tfidf.top_terms(k)
    }

    /// Heaviest TF-IDF terms of one destination's facilities.
    pub fn destination_keywords(&self, name: &str, k: usize) -> Result<Vec<(&str, f64)>> {
        let destination = validate_destination(&self.catalog, name)?;
        Ok(self.tfidf.keywords(destination.id, k).unwrap_or_default())
    }
}

/// Swappable handle to the current session.
///
/// Readers take an `Arc` snapshot and never observe a half-built session;
/// reloading builds a complete new session before swapping it in.
#[derive(Debug)]
pub struct SessionHandle {
    current: RwLock<Arc<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            current: RwLock::new(Arc::new(session)),
        }
    }

    pub fn snapshot(&self) -> Arc<Session> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Rebuild from `config` and swap it in; the old session stays live on failure.
    pub fn reload(&self, config: EngineConfig) -> Result<()> {
        let session = Session::load(config)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(session);
        tracing::info!("Session reloaded");
        Ok(())
    }
}
