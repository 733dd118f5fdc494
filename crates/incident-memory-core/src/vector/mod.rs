//! Vector math shared by every lane: normalization, quantization, similarity.
//!
//! All functions here are pure. Nothing touches storage.

mod normalize;
mod quantize;
mod similarity;

pub use normalize::{l2_norm, normalize, normalize_in_place};
pub use quantize::{quantize, BinaryVector};
pub use similarity::cosine_similarity;

/// Index of the first non-finite component, if any.
#[inline]
pub fn first_non_finite(vector: &[f32]) -> Option<(usize, f32)> {
    vector
        .iter()
        .copied()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
}
