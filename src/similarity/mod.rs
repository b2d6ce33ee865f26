//! Destination similarity: collaborative, content, and their fusion.
//!
//! Both engines produce a [`SimilarityMatrix`] indexed by destination id with
//! scores in `[0, 1]`. Fusion combines them linearly and memoizes the result per
//! weight.

pub(crate) mod collaborative;
pub(crate) mod content;
pub(crate) mod fusion;
pub(crate) mod matrix;

pub use collaborative::collaborative_similarity;
pub use content::{TfidfModel, content_similarity};
pub use fusion::{FusionCache, fuse};
pub use matrix::{SimilarityMatrix, cosine_similarity};
