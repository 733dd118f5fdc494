//! Storage error types.
//!
//! Every RocksDB failure carries the operation, column family and key involved.
//! Undecodable on-disk data is reported as corruption, never as a panic.
//! At the crate boundary these collapse into [`MemoryError`].

use incident_memory_core::error::MemoryError;
use thiserror::Error;

/// Low-level storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database failed to open at the specified path.
    #[error("Failed to open database at '{path}': {message}")]
    OpenFailed { path: String, message: String },

    /// Column family not found in the database.
    #[error("Column family '{name}' not found")]
    ColumnFamilyNotFound { name: String },

    /// A RocksDB call failed.
    #[error("RocksDB {operation} failed on CF '{cf}' with key '{key:?}': {source}")]
    RocksDbOperation {
        operation: &'static str,
        cf: &'static str,
        key: Option<String>,
        #[source]
        source: rocksdb::Error,
    },

    /// A value could not be encoded before writing.
    #[error("Serialization error for key '{key}': {message}")]
    Serialization { key: String, message: String },

    /// A stored value could not be decoded.
    #[error("Corrupted value in CF '{cf}' at key '{key}': {message}")]
    CorruptedValue {
        cf: &'static str,
        key: String,
        message: String,
    },

    /// A stored key does not follow the key format.
    #[error("Corrupted key in CF '{cf}': {key}")]
    CorruptedKey { cf: &'static str, key: String },

    /// A lane vector exists without its payload.
    #[error("Corrupted point '{id}' in collection '{collection}': lane vector without payload")]
    MissingPayload { collection: String, id: String },
}

impl StorageError {
    /// Create a RocksDB operation error.
    pub fn rocksdb_op(
        operation: &'static str,
        cf: &'static str,
        key: Option<&[u8]>,
        source: rocksdb::Error,
    ) -> Self {
        Self::RocksDbOperation {
            operation,
            cf,
            key: key.map(render_key),
            source,
        }
    }

    /// True if the error means on-disk data is damaged.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StorageError::CorruptedValue { .. }
                | StorageError::CorruptedKey { .. }
                | StorageError::MissingPayload { .. }
        )
    }
}

impl From<StorageError> for MemoryError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Serialization { .. } => MemoryError::Serialization(e.to_string()),
            other => MemoryError::BackendUnavailable(other.to_string()),
        }
    }
}

/// Renders a key for error messages: printable keys as text, NULs as `/`.
pub(crate) fn render_key(key: &[u8]) -> String {
    key.iter()
        .map(|&b| match b {
            0 => '/'.to_string(),
            0x20..=0x7e => (b as char).to_string(),
            _ => format!("\\x{b:02x}"),
        })
        .collect()
}

/// Convenient Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
