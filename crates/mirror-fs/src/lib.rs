//! Path model for git-sftp-mirror
//!
//! Provides forward-slash normalized paths and the mapping from
//! repository-relative paths to local and remote absolute paths.

pub mod error;
pub mod path;
pub mod resolver;

pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use resolver::{PathResolver, directory_of};
