//! Ingest pipeline: producer -> normalizer -> lane store.
//!
//! The store refuses vectors of the wrong width, so this is the one place where raw
//! producer output is fitted to a lane before it is written.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use incident_memory_core::config::IngestConfig;
use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::traits::{EvidenceInput, IncidentProducer, ProducedIncident};
use incident_memory_core::types::{Fidelity, IncidentId};
use incident_memory_core::vector::normalize;

use crate::lane_store::{LaneStore, PointWrite};

/// What was written for one piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub id: IncidentId,
    pub collection: String,
    pub lane: String,
    pub fidelity: Fidelity,
    /// Width of the producer's vector before fitting.
    pub raw_dim: usize,
    /// Lane width the vector was fitted to.
    pub stored_dim: usize,
}

/// Writes producer output into one collection.
///
/// Every producer call and every store write runs under the deadlines in
/// [`IngestConfig`]. A write that times out is abandoned by the caller but may still
/// land once the blocking pool gets to it.
pub struct IngestPipeline {
    store: Arc<LaneStore>,
    collection: String,
    config: IngestConfig,
}

impl IngestPipeline {
    pub fn new(store: Arc<LaneStore>, collection: impl Into<String>, config: IngestConfig) -> Self {
        Self {
            store,
            collection: collection.into(),
            config,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Produce, fit and upsert one incident into the producer's lane.
    ///
    /// # Errors
    ///
    /// - `EmbeddingFailure` if the producer fails or exceeds `produce_timeout_ms`
    /// - `BackendUnavailable` if the write fails or exceeds `store_timeout_ms`
    #[instrument(skip(self, producer, input), fields(collection = %self.collection, id = %id, fidelity = %producer.fidelity()))]
    pub async fn ingest(
        &self,
        producer: &dyn IncidentProducer,
        id: IncidentId,
        input: &EvidenceInput,
    ) -> MemoryResult<IngestReceipt> {
        let produced = self.produce(producer, input).await?;
        let lane = producer.lane().to_string();
        let raw_dim = produced.vector.len();

        let store = Arc::clone(&self.store);
        let collection = self.collection.clone();
        let (lane, id, stored_dim) = self
            .run_store(move || {
                let dim = store.resolve_schema(&collection)?.lane(&lane)?.dim;
                let vector = normalize(&produced.vector, dim)?;
                store.upsert(&collection, &id, &lane, &vector, &produced.payload)?;
                Ok((lane, id, dim))
            })
            .await?;

        info!(lane = %lane, raw_dim, stored_dim, "Ingested incident");
        Ok(IngestReceipt {
            id,
            collection: self.collection.clone(),
            lane,
            fidelity: producer.fidelity(),
            raw_dim,
            stored_dim,
        })
    }

    /// Produce all items, then write them in batched chunks.
    ///
    /// Production stops at the first failing or timed-out item and nothing is written.
    pub async fn ingest_many(
        &self,
        producer: &dyn IncidentProducer,
        items: Vec<(IncidentId, EvidenceInput)>,
    ) -> MemoryResult<Vec<IngestReceipt>> {
        let lane = producer.lane().to_string();
        let mut produced = Vec::with_capacity(items.len());
        for (id, input) in &items {
            let incident = self.produce(producer, input).await?;
            produced.push((id.clone(), incident));
        }

        let store = Arc::clone(&self.store);
        let collection = self.collection.clone();
        let fidelity = producer.fidelity();
        let lane_for_store = lane.clone();
        let receipts = self
            .run_store(move || {
                let dim = store.resolve_schema(&collection)?.lane(&lane_for_store)?.dim;
                let mut points = Vec::with_capacity(produced.len());
                let mut receipts = Vec::with_capacity(produced.len());
                for (id, incident) in produced {
                    receipts.push(IngestReceipt {
                        id: id.clone(),
                        collection: collection.clone(),
                        lane: lane_for_store.clone(),
                        fidelity,
                        raw_dim: incident.vector.len(),
                        stored_dim: dim,
                    });
                    points.push(PointWrite {
                        id,
                        vector: normalize(&incident.vector, dim)?,
                        payload: incident.payload,
                    });
                }
                store.upsert_batch(&collection, &lane_for_store, &points)?;
                Ok(receipts)
            })
            .await?;

        info!(
            collection = %self.collection,
            lane = %lane,
            count = receipts.len(),
            "Ingested batch"
        );
        Ok(receipts)
    }

    async fn produce(
        &self,
        producer: &dyn IncidentProducer,
        input: &EvidenceInput,
    ) -> MemoryResult<ProducedIncident> {
        let timeout = self.config.produce_timeout();
        match tokio::time::timeout(timeout, producer.produce(input)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    source = producer.source_tag(),
                    timeout_ms = millis(timeout),
                    "Producer timed out"
                );
                Err(MemoryError::EmbeddingFailure(format!(
                    "{} producer timed out after {} ms",
                    producer.source_tag(),
                    millis(timeout)
                )))
            }
        }
    }

    /// Runs a write on the blocking pool under `store_timeout_ms`.
    async fn run_store<T, F>(&self, f: F) -> MemoryResult<T>
    where
        F: FnOnce() -> MemoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let timeout = self.config.store_timeout();
        match tokio::time::timeout(timeout, tokio::task::spawn_blocking(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                error!(error = %join_error, "Ingest write task failed");
                Err(MemoryError::BackendUnavailable(format!(
                    "ingest write task failed: {join_error}"
                )))
            }
            Err(_) => {
                error!(timeout_ms = millis(timeout), "Ingest write timed out");
                Err(MemoryError::BackendUnavailable(format!(
                    "ingest write timed out after {} ms",
                    millis(timeout)
                )))
            }
        }
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}
