//! Error taxonomy for the incident memory.
//!
//! Every public operation in the workspace returns [`MemoryResult`]. The variants split
//! into three groups that callers treat differently:
//!
//! - Programmer errors (`InvalidConfiguration`, `InvalidArgument`, `DimensionMismatch`):
//!   surfaced immediately, never retried.
//! - Absence (`CollectionNotFound`, `NotFound`): the addressed entity does not exist.
//! - Operational (`BackendUnavailable`, `EmbeddingFailure`, `Serialization`): the system
//!   is degraded. Only `BackendUnavailable` is worth a bounded retry by the caller.
//!
//! "No precedent found" is not an error at all; see
//! [`ReferenceOutcome::None`](crate::types::ReferenceOutcome::None).

use thiserror::Error;

/// Errors produced by the incident memory.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Configuration or schema is unusable (zero lane dimension, bad threshold, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A call argument is invalid (k == 0, non-finite vector component, empty id).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Vector length disagrees with the lane schema.
    ///
    /// Always a caller bug. The store never truncates or pads on its own; callers run
    /// the normalizer first.
    #[error("Dimension mismatch on lane '{lane}': expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Lane whose schema was violated
        lane: String,
        /// Dimensionality declared by the lane schema
        expected: usize,
        /// Length of the vector that was supplied
        actual: usize,
    },

    /// The named collection has not been created.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// The addressed point, lane or document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The persistent store is unreachable, corrupt, or timed out.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// An external embedding call failed or timed out.
    #[error("Embedding failure: {0}")]
    EmbeddingFailure(String),

    /// A value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MemoryError {
    /// Creates a `DimensionMismatch` for `lane`.
    pub fn dimension_mismatch(lane: impl Into<String>, expected: usize, actual: usize) -> Self {
        MemoryError::DimensionMismatch {
            lane: lane.into(),
            expected,
            actual,
        }
    }

    /// True for errors caused by the caller's code rather than the environment.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            MemoryError::InvalidConfiguration(_)
                | MemoryError::InvalidArgument(_)
                | MemoryError::DimensionMismatch { .. }
        )
    }

    /// True if a bounded retry with backoff may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MemoryError::BackendUnavailable(_))
    }

    /// True if the error means "the thing is not there" rather than "the system is broken".
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            MemoryError::CollectionNotFound(_) | MemoryError::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for MemoryError {
    fn from(e: serde_json::Error) -> Self {
        MemoryError::Serialization(e.to_string())
    }
}

/// Convenient Result type for incident memory operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
