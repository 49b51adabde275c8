//! Signal handling for the one-shot runner

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shutdown signal raised by Ctrl-C.
///
/// The first Ctrl-C stops the recording gracefully rather than killing
/// the process mid-take.
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Install the Ctrl-C handler
    pub fn setup(&self) {
        let shutdown = Arc::clone(&self.shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.store(true, Ordering::SeqCst);
            }
        });
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
