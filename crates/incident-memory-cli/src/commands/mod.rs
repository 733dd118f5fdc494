//! Command handlers.
//!
//! Every handler returns the process exit code. Successful results are printed as
//! pretty JSON on stdout; errors are logged and printed on stderr.

pub mod args;
pub mod collections;
pub mod context;
pub mod get;
pub mod init;
pub mod knowledge;
pub mod reference;
pub mod search;
pub mod upsert;

pub use context::{CommandContext, GlobalOptions};

use incident_memory_core::error::MemoryResult;
use serde::Serialize;
use tracing::error;

use crate::error::{exit_code_for_error, CliExitCode};

/// Print `result` and map it to an exit code.
pub(crate) fn emit<T: Serialize>(command: &str, result: MemoryResult<T>) -> i32 {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => {
                println!("{json}");
                CliExitCode::Success.into()
            }
            Err(e) => {
                error!(command, error = %e, "failed to encode output");
                eprintln!("Error: failed to encode output: {e}");
                CliExitCode::Warning.into()
            }
        },
        Err(e) => {
            let code = exit_code_for_error(&e);
            error!(command, error = %e, exit_code = code as u8, "command failed");
            eprintln!("Error: {e}");
            code.into()
        }
    }
}
