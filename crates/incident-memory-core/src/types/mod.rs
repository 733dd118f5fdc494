//! Domain types shared across the workspace.

mod classification;
mod incident;
mod knowledge;
mod reference;
mod schema;

pub use classification::{
    classify_labels, Fidelity, IncidentStatus, RecommendedAction, FAST_LANE, OFFLINE_LANE,
};
pub use incident::{payload_fields, payload_text, IncidentId, IncidentPoint, Payload};
pub use knowledge::{KnowledgeDocument, KnowledgeHit};
pub use reference::{
    ReferenceCase, ReferenceOutcome, ReferenceSummary, NO_MATCH_DOCUMENT, NO_MATCH_SOLUTION,
};
pub use schema::{validate_name, CollectionSchema, DistanceMetric, LaneSpec, QuantizationKind};
