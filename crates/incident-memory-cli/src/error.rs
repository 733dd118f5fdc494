//! CLI exit code handling.
//!
//! Exit codes:
//! - 0: Success, including "no reference case found"
//! - 1: Recoverable error (bad arguments, missing collection, backend down)
//! - 2: Corruption detected in the store
//!
//! JSON results go to stdout; diagnostics go to stderr.

use std::process::ExitCode;

use incident_memory_core::error::MemoryError;

/// Exit codes for CLI commands.
///
/// Exit 2 is ONLY for corruption, where retrying or proceeding on the same database
/// would repeat the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    /// Success - JSON on stdout
    Success = 0,
    /// Recoverable error - message on stderr
    Warning = 1,
    /// Corrupted store - message on stderr
    Blocking = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

impl From<&MemoryError> for CliExitCode {
    fn from(err: &MemoryError) -> Self {
        match err {
            // Corrupted bytes surface as BackendUnavailable or Serialization
            MemoryError::BackendUnavailable(msg) if is_corruption_indicator(msg) => {
                CliExitCode::Blocking
            }
            MemoryError::Serialization(msg) if is_corruption_indicator(msg) => {
                CliExitCode::Blocking
            }

            MemoryError::InvalidConfiguration(_)
            | MemoryError::InvalidArgument(_)
            | MemoryError::DimensionMismatch { .. }
            | MemoryError::CollectionNotFound(_)
            | MemoryError::NotFound(_)
            | MemoryError::BackendUnavailable(_)
            | MemoryError::EmbeddingFailure(_)
            | MemoryError::Serialization(_) => CliExitCode::Warning,
        }
    }
}

/// Check if error message indicates corruption.
#[inline]
pub fn is_corruption_indicator(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    CORRUPTION_INDICATORS
        .iter()
        .any(|&indicator| lower.contains(indicator))
}

/// Corruption indicator strings (lowercase).
const CORRUPTION_INDICATORS: &[&str] = &[
    "corruption",
    "corrupted",
    "checksum",
    "checksum mismatch",
    "malformed",
    "truncated",
    "bad magic",
    "crc error",
];

/// Determine exit code for any error.
///
/// `MemoryError` is classified by variant; anything else falls back to its message.
pub fn exit_code_for_error(e: &(dyn std::error::Error + 'static)) -> CliExitCode {
    if let Some(memory_err) = e.downcast_ref::<MemoryError>() {
        return CliExitCode::from(memory_err);
    }

    let msg = e.to_string();
    if is_corruption_indicator(&msg) {
        CliExitCode::Blocking
    } else {
        CliExitCode::Warning
    }
}
