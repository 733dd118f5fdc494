//! Seams to external collaborators.

mod embedding_provider;
mod incident_producer;

pub use embedding_provider::{EmbeddingOutput, EmbeddingProvider};
pub use incident_producer::{EvidenceInput, IncidentProducer, ProducedIncident};
