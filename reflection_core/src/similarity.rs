//! The single similarity primitive shared by every overlap metric.
//!
//! "Echo", "resonance", and "keyword overlap" scores elsewhere in the engine
//! are all this Jaccard index applied to different input pairs.

use std::collections::HashSet;

use crate::lexicon::tokenize;

/// Jaccard index of two token sets: `|A ∩ B| / |A ∪ B|`.
///
/// Returns 0.0 when the union is empty.
fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f32 / union as f32
}

/// Similarity of two texts over their whitespace-split lowercased tokens.
///
/// Symmetric, and reflexive (1.0) for any text with at least one token.
pub fn text_similarity(a: &str, b: &str) -> f32 {
    let set_a: HashSet<String> = tokenize(a).into_iter().collect();
    let set_b: HashSet<String> = tokenize(b).into_iter().collect();
    jaccard(&set_a, &set_b)
}

/// Set-overlap variant restricted to already extracted keyword lists.
pub fn keyword_overlap(a: &[String], b: &[String]) -> f32 {
    let set_a: HashSet<String> = a.iter().cloned().collect();
    let set_b: HashSet<String> = b.iter().cloned().collect();
    jaccard(&set_a, &set_b)
}
