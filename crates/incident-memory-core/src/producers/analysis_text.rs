//! High-fidelity producer: embeds an analysis text.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{apply_slice, base_payload};
use crate::error::{MemoryError, MemoryResult};
use crate::traits::{EmbeddingProvider, EvidenceInput, IncidentProducer, ProducedIncident};
use crate::types::{payload_fields, Fidelity};

/// Embeds `EvidenceInput::analysis` through an [`EmbeddingProvider`].
///
/// With a `slice_dim`, the embedding is Matryoshka-sliced before it is handed to the
/// lane (e.g. 1536 -> 256, then zero-padded back to the lane width by the normalizer).
pub struct AnalysisTextProducer {
    embedder: Arc<dyn EmbeddingProvider>,
    slice_dim: Option<usize>,
    source: String,
}

impl AnalysisTextProducer {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            slice_dim: None,
            source: "cloud_analysis".to_string(),
        }
    }

    pub fn with_slice_dim(mut self, dim: usize) -> Self {
        self.slice_dim = Some(dim);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

#[async_trait]
impl IncidentProducer for AnalysisTextProducer {
    fn fidelity(&self) -> Fidelity {
        Fidelity::High
    }

    fn source_tag(&self) -> &str {
        &self.source
    }

    async fn produce(&self, input: &EvidenceInput) -> MemoryResult<ProducedIncident> {
        let analysis = input
            .analysis
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| {
                MemoryError::InvalidArgument("analysis text is required".to_string())
            })?;

        let output = self.embedder.embed(analysis).await?;
        debug!(
            model = %output.model_id,
            dimensions = output.dimensions,
            latency_ms = output.latency.as_millis() as u64,
            "Embedded analysis text"
        );

        let vector = apply_slice(output.vector, self.slice_dim)?;

        let mut payload = base_payload(input, &self.source);
        payload.insert(payload_fields::ANALYSIS.into(), Value::from(analysis));

        Ok(ProducedIncident { vector, payload })
    }
}
