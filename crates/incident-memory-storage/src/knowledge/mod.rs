//! Knowledge Store: nearest-neighbor search over rule and manual text.
//!
//! Structurally a one-lane collection in the same database as the images. Each
//! document is a point keyed by its text id, with `text`, `source` and `doc_type` in
//! the payload. The store only ever receives vectors; turning query text into a vector
//! is the caller's job (see [`embed_documents`] for the ingestion side).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use incident_memory_core::config::{KnowledgeConfig, SearchConfig};
use incident_memory_core::error::{MemoryError, MemoryResult};
use incident_memory_core::traits::EmbeddingProvider;
use incident_memory_core::types::{
    payload_text, CollectionSchema, IncidentId, KnowledgeDocument, KnowledgeHit, Payload,
};
use incident_memory_core::vector::normalize;

use crate::lane_store::{LaneStore, PointWrite};
use crate::search::RetrievalEngine;

const FIELD_TEXT: &str = "text";
const FIELD_SOURCE: &str = "source";
const FIELD_DOC_TYPE: &str = "doc_type";

/// Text-document store backed by a [`LaneStore`] collection.
pub struct KnowledgeStore {
    engine: RetrievalEngine,
    config: KnowledgeConfig,
}

impl KnowledgeStore {
    /// `search` tunes the shortlist when the knowledge lane is binary.
    pub fn new(store: Arc<LaneStore>, config: KnowledgeConfig, search: SearchConfig) -> Self {
        Self {
            engine: RetrievalEngine::new(store, search),
            config,
        }
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    pub fn search_config(&self) -> &SearchConfig {
        self.engine.config()
    }

    /// Vector width documents and queries must have.
    pub fn dim(&self) -> usize {
        self.config.dim
    }

    fn store(&self) -> &LaneStore {
        self.engine.store()
    }

    /// Create the knowledge collection if it does not exist.
    pub fn ensure(&self) -> MemoryResult<Arc<CollectionSchema>> {
        self.store()
            .ensure_collection(&self.config.collection, &[self.config.lane_spec()])
    }

    /// Store one embedded document. Re-inserting an id replaces it.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty id, empty text or a missing vector
    /// - `DimensionMismatch` if the vector is not `dim` wide
    pub fn insert_document(&self, doc: &KnowledgeDocument) -> MemoryResult<()> {
        check_document(doc)?;
        self.store().upsert(
            &self.config.collection,
            &IncidentId::Text(doc.id.clone()),
            &self.config.lane,
            &doc.vector,
            &document_payload(doc),
        )
    }

    /// Store many embedded documents. All are validated before any is written.
    pub fn insert_documents(&self, docs: &[KnowledgeDocument]) -> MemoryResult<usize> {
        let mut points = Vec::with_capacity(docs.len());
        for doc in docs {
            check_document(doc)?;
            points.push(PointWrite::new(
                doc.id.clone(),
                doc.vector.clone(),
                document_payload(doc),
            ));
        }
        let written = self
            .store()
            .upsert_batch(&self.config.collection, &self.config.lane, &points)?;
        info!(
            collection = %self.config.collection,
            documents = written,
            "Inserted knowledge documents"
        );
        Ok(written)
    }

    /// Document `id`, including its vector.
    pub fn get_document(&self, id: &str) -> MemoryResult<KnowledgeDocument> {
        let point = self
            .store()
            .get_point(&self.config.collection, &IncidentId::Text(id.to_string()))?;
        let vector = point
            .vectors
            .get(&self.config.lane)
            .cloned()
            .unwrap_or_default();
        Ok(document_from_payload(id.to_string(), &point.payload).with_vector(vector))
    }

    /// Number of stored documents.
    pub fn count(&self) -> MemoryResult<usize> {
        self.store().count(&self.config.collection, &self.config.lane)
    }

    /// Top-`k` documents by cosine similarity, highest first.
    ///
    /// # Errors
    ///
    /// Same as [`RetrievalEngine::search`]; the query must already be `dim` wide.
    pub fn search_knowledge(&self, query: &[f32], k: usize) -> MemoryResult<Vec<KnowledgeHit>> {
        let results = self
            .engine
            .search(&self.config.collection, &self.config.lane, query, k, false)?;
        debug!(
            hits = results.len(),
            latency_us = results.latency_us,
            "Knowledge search complete"
        );

        Ok(results
            .hits
            .into_iter()
            .map(|hit| {
                let doc = document_from_payload(hit.id.to_string(), &hit.payload);
                KnowledgeHit::from_document(doc, hit.score)
            })
            .collect())
    }
}

/// Embeds every document that has no vector yet and fits all vectors to `dim`.
///
/// Returns the number of documents that were embedded.
pub async fn embed_documents(
    embedder: &dyn EmbeddingProvider,
    docs: &mut [KnowledgeDocument],
    dim: usize,
) -> MemoryResult<usize> {
    let mut embedded = 0usize;
    for doc in docs.iter_mut() {
        if doc.needs_embedding() {
            doc.vector = embedder.embed(&doc.text).await?.vector;
            embedded += 1;
        }
        doc.vector = normalize(&doc.vector, dim)?;
    }
    Ok(embedded)
}

fn check_document(doc: &KnowledgeDocument) -> MemoryResult<()> {
    doc.validate()?;
    if doc.needs_embedding() {
        return Err(MemoryError::InvalidArgument(format!(
            "knowledge document '{}' has no vector",
            doc.id
        )));
    }
    Ok(())
}

fn document_payload(doc: &KnowledgeDocument) -> Payload {
    let mut payload = Payload::new();
    payload.insert(FIELD_TEXT.into(), Value::from(doc.text.as_str()));
    payload.insert(FIELD_SOURCE.into(), Value::from(doc.source.as_str()));
    payload.insert(FIELD_DOC_TYPE.into(), Value::from(doc.doc_type.as_str()));
    payload
}

fn document_from_payload(id: String, payload: &Payload) -> KnowledgeDocument {
    let field = |key: &str| payload_text(payload, key).unwrap_or_default();
    KnowledgeDocument::new(id, field(FIELD_TEXT), field(FIELD_SOURCE), field(FIELD_DOC_TYPE))
}
