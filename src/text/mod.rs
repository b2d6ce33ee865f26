//! Text processing for facility descriptions.
//!
//! Normalization strips facility text down to lower-case letters and whitespace;
//! tokenization splits it into terms for TF-IDF weighting.

pub(crate) mod normalize;
pub(crate) mod tokenize;

pub use normalize::normalize;
pub use tokenize::tokenize;
