//! Shared helpers for unit tests.

use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

/// How long [`stalled_blocking_runtime`] keeps its only blocking thread busy.
pub(crate) const STALL: Duration = Duration::from_millis(300);

/// Runtime whose single blocking thread is already occupied for [`STALL`].
///
/// Any `spawn_blocking` issued on it queues behind the stall, so a store deadline
/// shorter than [`STALL`] always expires.
pub(crate) fn stalled_blocking_runtime() -> Runtime {
    let runtime = Builder::new_current_thread()
        .max_blocking_threads(1)
        .enable_time()
        .build()
        .expect("Failed to build runtime");
    runtime.spawn_blocking(|| std::thread::sleep(STALL));
    runtime
}
