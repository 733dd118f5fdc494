//! One [`IncidentProducer`](crate::traits::IncidentProducer) per fidelity tier.
//!
//! | Producer | Tier | Vector source |
//! |----------|------|---------------|
//! | [`AnalysisTextProducer`] | High | embedding of the analysis text |
//! | [`DetectionVectorProducer`] | Low | locally computed feature vector |
//!
//! Both classify the evidence labels into status and action and write the same payload
//! keys, so the composer can read either tier's points.

mod analysis_text;
mod detection_vector;

pub use analysis_text::AnalysisTextProducer;
pub use detection_vector::DetectionVectorProducer;

use serde_json::Value;

use crate::error::{MemoryError, MemoryResult};
use crate::traits::EvidenceInput;
use crate::types::{classify_labels, payload_fields, Payload};
use crate::vector::normalize;

/// Applies a tier-level Matryoshka slice. Vectors already at or below `slice_dim` are
/// returned unchanged.
pub(crate) fn apply_slice(vector: Vec<f32>, slice_dim: Option<usize>) -> MemoryResult<Vec<f32>> {
    match slice_dim {
        Some(dim) if vector.len() > dim => normalize(&vector, dim),
        Some(0) => Err(MemoryError::InvalidConfiguration(
            "slice dimension must be greater than zero".to_string(),
        )),
        _ => Ok(vector),
    }
}

/// Builds the payload shared by both tiers.
pub(crate) fn base_payload(input: &EvidenceInput, source: &str) -> Payload {
    let mut labels: Vec<&str> = Vec::new();
    if let Some(f) = input.filename.as_deref() {
        labels.push(f);
    }
    if let Some(f) = input.folder.as_deref() {
        labels.push(f);
    }
    labels.extend(input.detections.iter().map(String::as_str));
    let (status, action) = classify_labels(&labels);

    let mut issues: Vec<&str> = input.detections.iter().map(String::as_str).collect();
    issues.sort_unstable();
    issues.dedup();

    let mut payload = Payload::new();
    payload.insert(payload_fields::STATUS.into(), Value::from(status.as_str()));
    payload.insert(payload_fields::SEVERITY.into(), Value::from(status.as_str()));
    payload.insert(
        payload_fields::RECOMMENDED_ACTION.into(),
        Value::from(action.as_str()),
    );
    payload.insert(payload_fields::SOURCE.into(), Value::from(source));
    if !issues.is_empty() {
        payload.insert(
            payload_fields::DETECTED_ISSUES.into(),
            Value::from(issues.into_iter().map(Value::from).collect::<Vec<_>>()),
        );
    }
    if let Some(f) = &input.filename {
        payload.insert(payload_fields::FILENAME.into(), Value::from(f.as_str()));
    }
    if let Some(f) = &input.folder {
        payload.insert(payload_fields::FOLDER.into(), Value::from(f.as_str()));
    }
    payload
}
