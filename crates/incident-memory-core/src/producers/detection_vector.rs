//! Low-fidelity producer: local detector output.

use async_trait::async_trait;

use super::{apply_slice, base_payload};
use crate::error::{MemoryError, MemoryResult};
use crate::traits::{EvidenceInput, IncidentProducer, ProducedIncident};
use crate::types::Fidelity;
use crate::vector::first_non_finite;

/// Passes through `EvidenceInput::features` computed on the device, with the detector
/// labels in the payload. Nothing leaves the machine.
#[derive(Debug, Clone)]
pub struct DetectionVectorProducer {
    slice_dim: Option<usize>,
    source: String,
}

impl Default for DetectionVectorProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionVectorProducer {
    pub fn new() -> Self {
        Self {
            slice_dim: None,
            source: "local_detector".to_string(),
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
impl IncidentProducer for DetectionVectorProducer {
    fn fidelity(&self) -> Fidelity {
        Fidelity::Low
    }

    fn source_tag(&self) -> &str {
        &self.source
    }

    async fn produce(&self, input: &EvidenceInput) -> MemoryResult<ProducedIncident> {
        if input.features.is_empty() {
            return Err(MemoryError::InvalidArgument(
                "feature vector is required".to_string(),
            ));
        }
        if let Some((i, v)) = first_non_finite(&input.features) {
            return Err(MemoryError::InvalidArgument(format!(
                "feature {i} is not finite: {v}"
            )));
        }

        let vector = apply_slice(input.features.clone(), self.slice_dim)?;
        Ok(ProducedIncident {
            vector,
            payload: base_payload(input, &self.source),
        })
    }
}
