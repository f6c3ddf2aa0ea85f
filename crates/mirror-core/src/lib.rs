//! Change classification and replay for git-sftp-mirror
//!
//! After a pull, every file-level change between the previous and the new
//! head is mapped to remote operations and replayed in diff order:
//!
//! - [`classify`] picks the action plan for one change record,
//! - [`Replayer`] executes a plan against an open remote session,
//! - [`ensure`] creates remote directories on demand,
//! - [`SyncDriver`] ties pull, diff and replay together.

pub mod classify;
pub mod driver;
pub mod ensure;
pub mod error;
pub mod log;
pub mod replay;

pub use classify::{Action, ActionPlan, NoopReason, classify, plan_all};
pub use driver::{FailedRecord, PulledChanges, SyncDriver, SyncReport};
pub use ensure::ensure;
pub use error::{Error, ReplayError, Result};
pub use log::{LogLevel, MemoryLog, SyncLog, TracingLog};
pub use replay::Replayer;
