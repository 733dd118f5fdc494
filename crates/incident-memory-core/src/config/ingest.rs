//! Ingest pipeline deadlines.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_produce_timeout_ms() -> u64 {
    2_000
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

/// Deadlines for one producer call and one store write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Per item. A batch gets this much for every item it produces.
    #[serde(default = "default_produce_timeout_ms")]
    pub produce_timeout_ms: u64,

    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            produce_timeout_ms: default_produce_timeout_ms(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl IngestConfig {
    #[inline]
    pub fn produce_timeout(&self) -> Duration {
        Duration::from_millis(self.produce_timeout_ms)
    }

    #[inline]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.produce_timeout_ms == 0 {
            return Err("produce_timeout_ms must be greater than zero".to_string());
        }
        if self.store_timeout_ms == 0 {
            return Err("store_timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}
