//! Remote filesystem traits

use mirror_fs::NormalizedPath;

use crate::Result;

/// What a remote path currently holds.
///
/// Always queried fresh; earlier actions in the same run may have changed
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEntry {
    Missing,
    Directory,
    /// A file, symlink or anything else that is not a directory.
    Other,
}

/// Outcome of removing a remote file.
///
/// Absence is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// An open session on a remote filesystem.
///
/// Dropping the value releases the session.
pub trait RemoteFs {
    /// The directory the session started in. Relative paths of the mirror
    /// are rooted here.
    fn working_dir(&self) -> &NormalizedPath;

    /// Existence and type of `path`.
    fn stat(&mut self, path: &NormalizedPath) -> Result<RemoteEntry>;

    /// Create `path` and every missing ancestor (`mkdir -p`).
    ///
    /// Fails with [`crate::Error::NotADirectory`] if any component exists
    /// as a non-directory.
    fn create_dir_all(&mut self, path: &NormalizedPath) -> Result<()>;

    /// Write the full contents of `local` to `remote`, replacing any file
    /// already there. Returns the number of bytes sent.
    fn upload(&mut self, local: &NormalizedPath, remote: &NormalizedPath) -> Result<u64>;

    /// Remove the file at `path`.
    fn remove_file(&mut self, path: &NormalizedPath) -> Result<RemoveOutcome>;
}

/// Opens [`RemoteFs`] sessions.
///
/// Kept separate from the session so callers can defer connecting until
/// there is work to do.
pub trait Connector {
    type Remote: RemoteFs;

    fn connect(&self) -> Result<Self::Remote>;
}
