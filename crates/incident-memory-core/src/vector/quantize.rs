//! Sign-bit binary quantization for low-fidelity lanes.
//!
//! # Algorithm
//!
//! 1. Binarize: value > 0.0 -> 1, else -> 0 (zero maps to 0)
//! 2. Pack 8 bits per byte, MSB first
//! 3. Compare packed vectors with XOR + popcount
//!
//! One-way: there is no dequantization. Exact scores are recovered by rescoring against
//! the full-precision vector kept beside the bits.

use serde::{Deserialize, Serialize};

/// Maps each component to 1 if strictly positive, else 0.
///
/// The output has the same length as the input. Feeding the output back in (as 0.0/1.0)
/// yields the same bits, so the transform is idempotent.
///
/// ```
/// use incident_memory_core::vector::quantize;
///
/// assert_eq!(quantize(&[0.5, 0.0, -0.1, 2.0]), vec![1, 0, 0, 1]);
/// ```
pub fn quantize(vector: &[f32]) -> Vec<u8> {
    vector.iter().map(|&v| u8::from(v > 0.0)).collect()
}

/// Packed sign bits of a vector.
///
/// Bit 7 of byte 0 is component 0, bit 6 of byte 0 is component 1, and so on. Trailing
/// bits of the last byte are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryVector {
    bits: Vec<u8>,
    dim: usize,
}

impl BinaryVector {
    /// Quantizes and packs `vector`.
    pub fn from_floats(vector: &[f32]) -> Self {
        let dim = vector.len();
        let mut bits = vec![0u8; dim.div_ceil(8)];
        for (i, &v) in vector.iter().enumerate() {
            if v > 0.0 {
                bits[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        Self { bits, dim }
    }

    /// Number of components represented.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Packed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Unpacks to one 0/1 value per component.
    pub fn to_bits(&self) -> Vec<u8> {
        (0..self.dim)
            .map(|i| (self.bits[i / 8] >> (7 - (i % 8))) & 1)
            .collect()
    }

    /// Number of differing bits, or `None` if the dimensions differ.
    pub fn hamming_distance(&self, other: &BinaryVector) -> Option<u32> {
        if self.dim != other.dim {
            return None;
        }
        Some(
            self.bits
                .iter()
                .zip(other.bits.iter())
                .map(|(&a, &b)| (a ^ b).count_ones())
                .sum(),
        )
    }

    /// Cosine estimate of the two sign vectors: `1 - 2 * hamming / dim`, in [-1, 1].
    ///
    /// Identical bit patterns score 1.0. Returns 0.0 for mismatched or empty vectors.
    pub fn approximate_cosine(&self, other: &BinaryVector) -> f32 {
        match self.hamming_distance(other) {
            Some(distance) if self.dim > 0 => 1.0 - 2.0 * distance as f32 / self.dim as f32,
            _ => 0.0,
        }
    }
}
