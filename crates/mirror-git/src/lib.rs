//! Git working copy access for git-sftp-mirror
//!
//! Reads the head snapshot, pulls from a remote and turns the tree diff
//! between two snapshots into an ordered list of change records.

pub mod change;
pub mod error;
pub mod provider;
pub mod working_copy;

pub use change::{ChangeKind, ChangeRecord, SnapshotId};
pub use error::{Error, Result};
pub use provider::WorkingCopy;
pub use working_copy::GitWorkingCopy;
