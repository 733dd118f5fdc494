//! Deterministic local text embedder.
//!
//! Feature-hashed bag of words: every lowercase alphanumeric token is hashed (FNV-1a)
//! to a bucket and a sign, counts are accumulated, and the result is L2-normalized.
//! Texts sharing vocabulary land close together, which is enough for rule lookup in
//! offline deployments and for tests. No model files, no randomness.

use std::time::Instant;

use async_trait::async_trait;

use crate::error::{MemoryError, MemoryResult};
use crate::traits::{EmbeddingOutput, EmbeddingProvider};
use crate::vector::normalize_in_place;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Feature-hashing [`EmbeddingProvider`].
///
/// ```
/// use incident_memory_core::stubs::HashingEmbedder;
/// use incident_memory_core::traits::EmbeddingProvider;
///
/// let embedder = HashingEmbedder::new(384);
/// assert_eq!(embedder.dimensions(), 384);
/// assert_eq!(embedder.model_id(), "hashing-bow-384");
/// ```
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
    model_id: String,
}

impl HashingEmbedder {
    /// A zero `dim` is accepted here and rejected at embed time.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            model_id: format!("hashing-bow-{dim}"),
        }
    }

    fn fnv1a(bytes: &[u8]) -> u64 {
        bytes.iter().fold(FNV_OFFSET, |hash, &b| {
            (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
        })
    }

    fn tokens(content: &str) -> impl Iterator<Item = String> + '_ {
        content
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Synchronous embedding used by the async trait impl.
    pub fn embed_sync(&self, content: &str) -> MemoryResult<Vec<f32>> {
        if self.dim == 0 {
            return Err(MemoryError::InvalidConfiguration(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }

        let mut vector = vec![0.0f32; self.dim];
        let mut seen = 0usize;
        for token in Self::tokens(content) {
            let hash = Self::fnv1a(token.as_bytes());
            let bucket = (hash % self.dim as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
            seen += 1;
        }

        if seen == 0 {
            return Err(MemoryError::EmbeddingFailure(
                "content has no tokens to embed".to_string(),
            ));
        }
        // All tokens can cancel out in rare collisions; a zero vector is still valid.
        normalize_in_place(&mut vector);
        Ok(vector)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, content: &str) -> MemoryResult<EmbeddingOutput> {
        let start = Instant::now();
        let vector = self.embed_sync(content)?;
        EmbeddingOutput::new(vector, self.model_id.clone(), start.elapsed())
    }

    fn dimensions(&self) -> usize {
        self.dim
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
