//! Hybrid tourist-destination recommendations.
//!
//! Destinations are compared two ways: collaboratively, by the cosine of their
//! user-rating columns, and by content, by the cosine of TF-IDF vectors over their
//! facility descriptions. The two similarity matrices are fused with a weight
//! `alpha` and used to rank destinations for a set of visited places. A second
//! resolver ranks destinations by mean rating within a demographic cohort.
//!
//! ```no_run
//! use tour_recommender::{EngineConfig, Session};
//!
//! let session = Session::load(EngineConfig::default())?;
//! for rec in session.recommend(&["Pantai Boom"], 5, 0.6)? {
//!     println!("{} ({:.2})", rec.name, rec.score);
//! }
//! # Ok::<(), tour_recommender::EngineError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod recommend;
pub mod session;
pub mod similarity;
pub mod text;
pub mod validate;

pub use config::{EngineConfig, SchemaConfig};
pub use data::{Catalog, Destination, DestinationId, RatingTable, load};
pub use error::{EngineError, Result};
pub use recommend::{Profile, Recommendation, recommend, recommend_by_profile};
pub use session::{Session, SessionHandle};
pub use similarity::{SimilarityMatrix, collaborative_similarity, content_similarity, fuse};
pub use text::normalize;
