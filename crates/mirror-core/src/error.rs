//! Error types for mirror-core

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Setup errors. These abort a run before or instead of the replay loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Git(#[from] mirror_git::Error),

    #[error(transparent)]
    Remote(#[from] mirror_remote::Error),
}

/// Failure to replay a single change record.
///
/// Caught at the record boundary; the run continues with the next record.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Remote path {path} exists and is not a directory")]
    RemoteDirectoryConflict { path: String },

    #[error(transparent)]
    Remote(#[from] mirror_remote::Error),

    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}
