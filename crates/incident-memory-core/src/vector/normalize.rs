//! Vector Normalizer: fit an arbitrary-length embedding into a lane's width.
//!
//! Two branches, and they are not symmetric:
//!
//! ```text
//! len < target   pad with zeros        (norm unchanged, no renormalization)
//! len == target  copy                  (untouched)
//! len > target   keep prefix, then L2-renormalize  ("Matryoshka slicing")
//! ```
//!
//! Truncating without renormalizing leaves a prefix whose norm is < 1, which silently
//! shifts every cosine score computed against it. A zero prefix stays zero.

use crate::error::{MemoryError, MemoryResult};

/// Returns a vector of exactly `target_dim` components derived from `vector`.
///
/// # Errors
///
/// `InvalidConfiguration` if `target_dim == 0`.
///
/// # Example
///
/// ```
/// use incident_memory_core::vector::normalize;
///
/// let padded = normalize(&[0.6, 0.8], 4).unwrap();
/// assert_eq!(padded, vec![0.6, 0.8, 0.0, 0.0]);
///
/// let sliced = normalize(&[3.0, 4.0, 12.0], 2).unwrap();
/// assert!((sliced[0] - 0.6).abs() < 1e-6);
/// assert!((sliced[1] - 0.8).abs() < 1e-6);
/// ```
pub fn normalize(vector: &[f32], target_dim: usize) -> MemoryResult<Vec<f32>> {
    if target_dim == 0 {
        return Err(MemoryError::InvalidConfiguration(
            "target dimension must be greater than zero".to_string(),
        ));
    }

    if vector.len() > target_dim {
        return Ok(truncate_and_renormalize(vector, target_dim));
    }

    Ok(pad_with_zeros(vector, target_dim))
}

/// Copies `vector` and appends zeros up to `target_dim`. Caller guarantees
/// `vector.len() <= target_dim`.
fn pad_with_zeros(vector: &[f32], target_dim: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(target_dim);
    out.extend_from_slice(vector);
    out.resize(target_dim, 0.0);
    out
}

/// Keeps the first `target_dim` components and rescales them to unit length.
fn truncate_and_renormalize(vector: &[f32], target_dim: usize) -> Vec<f32> {
    let mut out = vector[..target_dim].to_vec();
    normalize_in_place(&mut out);
    out
}

/// Euclidean length of `vector`.
#[inline]
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Scales `vector` to unit L2 norm. Zero (or non-finite norm) vectors are left as-is.
///
/// Returns `true` if the vector was rescaled.
pub fn normalize_in_place(vector: &mut [f32]) -> bool {
    let norm = l2_norm(vector);
    if norm == 0.0 || !norm.is_finite() {
        return false;
    }
    for v in vector.iter_mut() {
        *v /= norm;
    }
    true
}
