//! Root configuration for the incident memory.
//!
//! # Loading Configuration
//!
//! ```rust,ignore
//! use incident_memory_core::config::MemoryConfig;
//!
//! let config = MemoryConfig::from_file("incident_memory.toml")?
//!     .with_env_overrides();
//! config.validate()?;
//! ```
//!
//! # TOML Structure
//!
//! ```toml
//! [storage]
//! path = "./incident_db"
//! auto_create_collections = false
//!
//! [images]
//! collection = "rail_safety_logs"
//! [[images.lanes]]
//! name = "fast_lane"
//! dim = 1536
//! quantization = "none"
//! [[images.lanes]]
//! name = "offline_lane"
//! dim = 768
//! quantization = "binary"
//!
//! [knowledge]
//! collection = "railway_knowledge"
//! dim = 384
//!
//! [search]
//! oversampling = 4.0
//! min_shortlist = 16
//!
//! [reference]
//! confident_match_threshold = 0.7
//! knowledge_relevance_threshold = 0.5
//! knowledge_k = 2
//!
//! [ingest]
//! produce_timeout_ms = 2000
//! store_timeout_ms = 5000
//! ```
//!
//! Every section is optional; missing keys take their defaults. Invalid values are
//! rejected by [`MemoryConfig::validate`], never silently corrected.

mod collections;
mod ingest;
mod reference;
mod search;
mod storage;


pub use collections::{ImagesConfig, KnowledgeConfig};
pub use ingest::IngestConfig;
pub use reference::ReferenceConfig;
pub use search::SearchConfig;
pub use storage::StorageConfig;

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub reference: ReferenceConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

impl MemoryConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> MemoryResult<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            MemoryError::InvalidConfiguration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            MemoryError::InvalidConfiguration(format!(
                "Failed to parse TOML in '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> MemoryResult<Self> {
        toml::from_str(toml)
            .map_err(|e| MemoryError::InvalidConfiguration(format!("Failed to parse TOML: {}", e)))
    }

    pub fn to_toml_string(&self) -> MemoryResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            MemoryError::InvalidConfiguration(format!("Failed to serialize to TOML: {}", e))
        })
    }

    /// Validate all sections, returning the first error found.
    pub fn validate(&self) -> MemoryResult<()> {
        self.storage
            .validate()
            .map_err(|e| MemoryError::InvalidConfiguration(format!("[storage] {}", e)))?;

        self.images.validate()?;
        self.knowledge.validate()?;

        if self.images.collection == self.knowledge.collection {
            return Err(MemoryError::InvalidConfiguration(format!(
                "images and knowledge must use different collections, both are '{}'",
                self.images.collection
            )));
        }

        self.search
            .validate()
            .map_err(|e| MemoryError::InvalidConfiguration(format!("[search] {}", e)))?;

        self.reference
            .validate()
            .map_err(|e| MemoryError::InvalidConfiguration(format!("[reference] {}", e)))?;

        self.ingest
            .validate()
            .map_err(|e| MemoryError::InvalidConfiguration(format!("[ingest] {}", e)))?;

        Ok(())
    }

    /// Apply environment variable overrides. Prefix: `INCIDENT_MEMORY_`
    ///
    /// | Variable | Config Path | Type |
    /// |----------|-------------|------|
    /// | `INCIDENT_MEMORY_DB_PATH` | `storage.path` | path |
    /// | `INCIDENT_MEMORY_AUTO_CREATE` | `storage.auto_create_collections` | bool |
    /// | `INCIDENT_MEMORY_CONFIDENT_THRESHOLD` | `reference.confident_match_threshold` | f32 |
    /// | `INCIDENT_MEMORY_KNOWLEDGE_THRESHOLD` | `reference.knowledge_relevance_threshold` | f32 |
    /// | `INCIDENT_MEMORY_EMBED_TIMEOUT_MS` | `reference.embed_timeout_ms` | u64 |
    ///
    /// Unparseable values are ignored; `validate()` still runs afterwards.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var("INCIDENT_MEMORY_DB_PATH") {
            self.storage.path = PathBuf::from(val);
        }
        if let Ok(val) = env::var("INCIDENT_MEMORY_AUTO_CREATE") {
            if let Ok(b) = val.parse::<bool>() {
                self.storage.auto_create_collections = b;
            }
        }
        if let Ok(val) = env::var("INCIDENT_MEMORY_CONFIDENT_THRESHOLD") {
            if let Ok(t) = val.parse::<f32>() {
                self.reference.confident_match_threshold = t;
            }
        }
        if let Ok(val) = env::var("INCIDENT_MEMORY_KNOWLEDGE_THRESHOLD") {
            if let Ok(t) = val.parse::<f32>() {
                self.reference.knowledge_relevance_threshold = t;
            }
        }
        if let Ok(val) = env::var("INCIDENT_MEMORY_EMBED_TIMEOUT_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.reference.embed_timeout_ms = ms;
            }
        }

        self
    }
}
