//! Source tables: destination descriptions and user ratings.

pub(crate) mod loader;
pub(crate) mod types;

pub use loader::{load, load_descriptions, load_ratings, read_descriptions, read_ratings};
pub use types::{Catalog, Destination, DestinationId, RatingRow, RatingTable};
