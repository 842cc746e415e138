use ndarray::ArrayView1;

// Sums run in f64: squares of any finite f32 neither overflow nor underflow there.

/// Dot product of two equal-length vectors. Returns `0.0` when lengths differ.
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    dot_f64(a, b) as f32
}

#[must_use]
pub fn l2_norm(v: &[f32]) -> f32 {
    l2_norm_f64(v) as f32
}

/// Cosine similarity in `[-1, 1]`, or `0.0` if either vector has zero norm
/// or the lengths differ. Inputs are expected to be finite.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    cosine_with_norms(a, l2_norm_f64(a), b, l2_norm_f64(b))
}

pub(crate) fn dot_f64(a: &[f32], b: &[f32]) -> f64 {
    ArrayView1::from(a)
        .iter()
        .zip(ArrayView1::from(b).iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

pub(crate) fn l2_norm_f64(v: &[f32]) -> f64 {
    ArrayView1::from(v)
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity with both norms already known.
pub(crate) fn cosine_with_norms(a: &[f32], norm_a: f64, b: &[f32], norm_b: f64) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let score = dot_f64(a, b) / (norm_a * norm_b);
    score.clamp(-1.0, 1.0) as f32
}
