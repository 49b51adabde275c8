//! Application layer - The recorder service and port interfaces
//!
//! Contains the core recording/upload flow and trait definitions
//! for external system interactions.

pub mod ports;
pub mod recorder;
pub mod spool;

// Re-export the service surface
pub use recorder::{RecordOptions, RecorderError, RecorderListener, RecorderService};
pub use spool::SpoolDir;
