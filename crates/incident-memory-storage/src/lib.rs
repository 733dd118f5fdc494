//! Incident Memory Storage Layer
//!
//! Persistent multi-lane vector memory built on RocksDB, plus everything that reads
//! from it.
//!
//! # Components
//!
//! - [`LaneStore`]: collections of points with one vector per lane and a JSON payload
//! - [`RetrievalEngine`]: top-k cosine search over one lane, with optional rescoring
//!   of binary-quantized lanes
//! - [`KnowledgeStore`]: one-lane text collection searched for supporting rules
//! - [`ReferenceCaseComposer`]: best precedent plus relevant rules for a query
//! - [`IngestPipeline`]: producer output fitted to a lane and written
//!
//! # Column Families
//!
//! See [`column_families`] for the on-disk layout and [`schema`] for key formats.
//!
//! # Errors
//!
//! Public operations return [`MemoryResult`](incident_memory_core::MemoryResult).
//! RocksDB failures and corrupt data become `BackendUnavailable` with the offending
//! key in the message; nothing in this crate panics on bad on-disk bytes.

pub mod column_families;
pub mod error;
pub mod ingest;
pub mod knowledge;
pub mod lane_store;
pub mod reference;
pub mod schema;
pub mod search;
pub mod serialization;

#[cfg(test)]
mod test_helpers;

pub use error::{StorageError, StorageResult};
pub use ingest::{IngestPipeline, IngestReceipt};
pub use knowledge::{embed_documents, KnowledgeStore};
pub use lane_store::{LaneStore, PointWrite, UPSERT_CHUNK};
pub use reference::ReferenceCaseComposer;
pub use search::{RetrievalEngine, ScoredPoint, SearchResults};
