//! Error types for mirror-git

use std::path::PathBuf;

/// Result type for mirror-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Could not load git repository in directory {path}")]
    NotARepository { path: PathBuf },

    #[error("Repository at {path} is bare; a working tree is required")]
    BareRepository { path: PathBuf },

    #[error("HEAD is detached; pass a branch name to pull")]
    DetachedHead,

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Pull failed: {message}")]
    PullFailed { message: String },

    #[error("{message}")]
    CannotFastForward { message: String },

    #[error("Invalid snapshot id '{id}'")]
    InvalidSnapshot { id: String },
}
