//! Facility-text cleanup applied before term weighting.

use regex::Regex;
use std::sync::LazyLock;

/// Anything that is not an ASCII letter or whitespace.
static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("valid regex"));

/// Lower-cases text and strips every character outside `[a-zA-Z]` and whitespace.
///
/// Absent text normalizes to the empty string. Whitespace is preserved as-is,
/// so `"Toilet & Musholla"` becomes `"toilet  musholla"` (two spaces). The
/// function is idempotent.
pub fn normalize(text: Option<&str>) -> String {
    match text {
        Some(text) => NON_ALPHA.replace_all(&text.to_lowercase(), "").into_owned(),
        None => String::new(),
    }
}
