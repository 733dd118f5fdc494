//! Persistent store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_path() -> PathBuf {
    PathBuf::from("./incident_db")
}

fn default_block_cache_size() -> usize {
    64 * 1024 * 1024
}

fn default_max_open_files() -> i32 {
    512
}

fn default_enable_wal() -> bool {
    true
}

/// RocksDB tuning and collection lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database directory. Created on first open.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Shared LRU block cache in bytes.
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: usize,

    /// -1 means unlimited.
    #[serde(default = "default_max_open_files")]
    pub max_open_files: i32,

    #[serde(default = "default_enable_wal")]
    pub enable_wal: bool,

    /// Create a collection from the configured schema on first upsert instead of
    /// failing with `CollectionNotFound`.
    #[serde(default)]
    pub auto_create_collections: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            block_cache_size: default_block_cache_size(),
            max_open_files: default_max_open_files(),
            enable_wal: default_enable_wal(),
            auto_create_collections: false,
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("path must not be empty".to_string());
        }
        if self.max_open_files == 0 || self.max_open_files < -1 {
            return Err(format!(
                "max_open_files must be -1 or positive, got {}",
                self.max_open_files
            ));
        }
        Ok(())
    }
}
