//! Command implementations for mirror-cli

pub mod sync;

pub use sync::{SyncOptions, run_sync};
