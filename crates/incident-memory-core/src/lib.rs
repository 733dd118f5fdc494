//! Incident Memory Core Library
//!
//! Domain types, vector math and collaborator traits for a multi-fidelity incident
//! memory: incidents embedded by pipelines of different cost and precision are fitted
//! into named lanes, retrieved by cosine similarity, and joined with rule text into a
//! reference case.
//!
//! # Architecture
//!
//! This crate defines:
//! - Vector Normalizer, Quantizer and cosine similarity (`vector`)
//! - Domain types (`IncidentId`, `CollectionSchema`, `ReferenceCase`, ...)
//! - Collaborator traits (`EmbeddingProvider`, `IncidentProducer`)
//! - One producer per fidelity tier and a deterministic local embedder
//! - Error taxonomy and configuration
//!
//! It performs no I/O. Persistence and retrieval live in `incident-memory-storage`.
//!
//! # Example
//!
//! ```
//! use incident_memory_core::vector::{normalize, quantize};
//!
//! let fitted = normalize(&[1.0; 1536], 256).unwrap();
//! assert!((fitted[0] - 1.0 / 16.0).abs() < 1e-6);
//! assert_eq!(quantize(&[0.2, -0.2]), vec![1, 0]);
//! ```

pub mod config;
pub mod error;
pub mod producers;
pub mod stubs;
pub mod traits;
pub mod types;
pub mod vector;

pub use config::MemoryConfig;
pub use error::{MemoryError, MemoryResult};
