use crate::core::vectorizer::{TermVector, TfIdfMatrix};

/// Cosine similarity between two term vectors
///
/// Defined as 0 when either vector has no terms. With non-negative
/// weights the result lies in [0, 1]; it is clamped to absorb rounding.
#[inline]
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }

    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Similarity of one profile against every profile in the snapshot,
/// itself included
///
/// Returns an empty row when `index` is out of range.
pub fn similarity_row(matrix: &TfIdfMatrix, index: usize) -> Vec<f64> {
    let Some(target) = matrix.vector(index) else {
        return Vec::new();
    };

    matrix
        .vectors()
        .iter()
        .map(|other| cosine_similarity(target, other))
        .collect()
}

/// Full pairwise similarity matrix
pub fn similarity_matrix(matrix: &TfIdfMatrix) -> Vec<Vec<f64>> {
    (0..matrix.len())
        .map(|i| similarity_row(matrix, i))
        .collect()
}
