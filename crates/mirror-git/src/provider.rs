//! Version-control collaborator trait

use mirror_fs::NormalizedPath;

use crate::{ChangeRecord, Result, SnapshotId};

/// Trait for the version-control side of a mirror run.
///
/// Implementations own a local working copy that can be pulled and diffed.
pub trait WorkingCopy {
    /// Root of the working tree that local paths resolve against.
    fn root(&self) -> &NormalizedPath;

    /// Identifier of the tree HEAD currently points at.
    fn head(&self) -> Result<SnapshotId>;

    /// Pull from the configured remote and return the new head snapshot.
    ///
    /// # Note
    /// Returns the unchanged head when already up to date.
    fn pull(&self) -> Result<SnapshotId>;

    /// Ordered change records between two snapshots.
    ///
    /// Order is whatever the diff algorithm produces; callers replay it
    /// as-is.
    fn diff(&self, from: &SnapshotId, to: &SnapshotId) -> Result<Vec<ChangeRecord>>;
}
