//! Cosine similarity, the only metric lanes use.

/// Raw cosine similarity in [-1, 1].
///
/// Returns 0.0 for empty inputs, mismatched lengths, or zero-magnitude vectors, so a
/// degenerate vector never produces NaN in a ranking.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut mag_a = 0.0f32;
    let mut mag_b = 0.0f32;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    (dot / (mag_a.sqrt() * mag_b.sqrt())).clamp(-1.0, 1.0)
}
