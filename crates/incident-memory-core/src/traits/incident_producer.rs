//! Vector-producing pipelines.
//!
//! Each fidelity tier (cloud analysis, local detector) is one implementation. The
//! memory only sees `(vector, payload)` and the lane the producer targets; it does not
//! care whether the vector came from a hosted model, local inference or a placeholder.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MemoryResult;
use crate::types::{Fidelity, Payload};

/// Raw evidence handed to a producer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceInput {
    /// Identifying file name, stored as `filename` in the payload.
    pub filename: Option<String>,
    /// Folder or category the evidence was filed under.
    pub folder: Option<String>,
    /// Free-text analysis (high fidelity).
    pub analysis: Option<String>,
    /// Detector class labels (low fidelity).
    #[serde(default)]
    pub detections: Vec<String>,
    /// Precomputed feature vector (low fidelity).
    #[serde(default)]
    pub features: Vec<f32>,
}

/// What a producer emits for one piece of evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducedIncident {
    /// Raw vector, not yet fitted to the lane.
    pub vector: Vec<f32>,
    pub payload: Payload,
}

/// A pipeline that turns evidence into a vector and a payload.
#[async_trait]
pub trait IncidentProducer: Send + Sync {
    /// Tier this producer belongs to.
    fn fidelity(&self) -> Fidelity;

    /// Lane this producer writes to. Defaults to the tier's lane.
    fn lane(&self) -> &str {
        self.fidelity().lane_name()
    }

    /// Short tag written to the payload's `source` field.
    fn source_tag(&self) -> &str;

    async fn produce(&self, input: &EvidenceInput) -> MemoryResult<ProducedIncident>;
}
