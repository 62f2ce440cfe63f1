//! Vector normalization and similarity functions.

/// Computes the L2 (Euclidean) norm of a vector.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "vector norms are floating point by definition")]
pub fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|value| value * value).sum::<f32>().sqrt()
}

/// L2-normalizes a vector in place. Zero vectors remain zero.
#[expect(clippy::float_arithmetic, reason = "vector norms are floating point by definition")]
pub fn l2_normalize(values: &mut [f32]) {
    let norm = l2_norm(values);
    if norm > 0.0 {
        for value in values.iter_mut() {
            *value /= norm;
        }
    }
}

/// Cosine similarity between two vectors.
///
/// Returns `0.0` when either vector is zero or the dimensions differ, so a
/// malformed stored vector ranks last instead of aborting a search.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "cosine similarity is floating point by definition")]
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    if left.len() != right.len() {
        return 0.0;
    }
    let dot: f32 = left.iter().zip(right).map(|(a, b)| a * b).sum();
    let norm_left = l2_norm(left);
    let norm_right = l2_norm(right);
    if norm_left == 0.0 || norm_right == 0.0 {
        return 0.0;
    }
    dot / (norm_left * norm_right)
}
