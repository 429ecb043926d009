//! Similarity score between two documents.
//!
//! The score charges every scored difference against both documents:
//!
//! ```text
//! ratio = max(0, 100 - (2 * differences / total_leaves) * 100)
//! ```
//!
//! where `total_leaves` counts text leaves and attribute values of both
//! documents. Two documents without leaves score 100.

use crate::diff::Difference;
use crate::tree::Document;

/// Leaves of both documents combined.
pub fn total_leaves(left: &Document, right: &Document) -> usize {
    left.leaf_count() + right.leaf_count()
}

/// Score in `[0, 100]`, rounded to two decimals.
///
/// `differences` should already exclude ignored ones; see [`scored`].
pub fn match_ratio(left: &Document, right: &Document, differences: usize) -> f64 {
    ratio_for(total_leaves(left, right), differences)
}

/// Score from precomputed counts.
pub fn ratio_for(total_leaves: usize, differences: usize) -> f64 {
    if total_leaves == 0 {
        return 100.0;
    }

    let weight = (differences * 2) as f64;
    let ratio = (100.0 - (weight / total_leaves as f64) * 100.0).max(0.0);
    round2(ratio)
}

/// Number of differences that are not ignored.
pub fn scored(differences: &[Difference]) -> usize {
    differences.iter().filter(|d| !d.ignored).count()
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
