//! Text-to-vector collaborator.
//!
//! The memory never embeds text itself. Whatever model turns a problem summary or a
//! rule into a vector sits behind this trait and is passed in explicitly.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};

/// Embedding vector plus provenance.
///
/// # Example
///
/// ```rust
/// use incident_memory_core::traits::EmbeddingOutput;
/// use std::time::Duration;
///
/// let output = EmbeddingOutput::new(vec![0.6, 0.8], "hashing-v1", Duration::from_micros(40)).unwrap();
/// assert_eq!(output.dimensions, 2);
/// assert!((output.magnitude() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingOutput {
    pub vector: Vec<f32>,
    pub model_id: String,
    pub dimensions: usize,
    #[serde(with = "duration_millis")]
    pub latency: Duration,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        (d.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

impl EmbeddingOutput {
    /// # Errors
    ///
    /// `EmbeddingFailure` if the vector is empty or contains NaN/Inf.
    pub fn new(
        vector: Vec<f32>,
        model_id: impl Into<String>,
        latency: Duration,
    ) -> MemoryResult<Self> {
        if vector.is_empty() {
            return Err(MemoryError::EmbeddingFailure(
                "Empty embedding vector".to_string(),
            ));
        }
        if let Some((i, v)) = crate::vector::first_non_finite(&vector) {
            return Err(MemoryError::EmbeddingFailure(format!(
                "Non-finite embedding component {v} at index {i}"
            )));
        }
        let dimensions = vector.len();
        Ok(Self {
            vector,
            model_id: model_id.into(),
            dimensions,
            latency,
        })
    }

    pub fn magnitude(&self) -> f32 {
        crate::vector::l2_norm(&self.vector)
    }
}

/// Converts UTF-8 text into a fixed-dimension vector.
///
/// Implementations must be `Send + Sync`; one instance is shared by every caller.
/// Failures are `EmbeddingFailure`. Timeouts are applied by the caller.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text.
    async fn embed(&self, content: &str) -> MemoryResult<EmbeddingOutput>;

    /// Embed many texts, preserving order. The default calls [`embed`](Self::embed)
    /// sequentially.
    async fn embed_batch(&self, contents: &[String]) -> MemoryResult<Vec<EmbeddingOutput>> {
        let mut out = Vec::with_capacity(contents.len());
        for content in contents {
            out.push(self.embed(content).await?);
        }
        Ok(out)
    }

    /// Output dimensionality.
    fn dimensions(&self) -> usize;

    fn model_id(&self) -> &str;
}
