//! Remote filesystem access for git-sftp-mirror
//!
//! The [`RemoteFs`] trait is the file-transfer surface the mirror needs.
//! [`SftpConnector`] provides it over SSH; [`MemoryConnector`] provides it
//! in-process.

pub mod config;
pub mod error;
pub mod memory;
pub mod provider;
pub mod sftp;

pub use config::ConnectionConfig;
pub use error::{Error, Result};
pub use memory::{MemoryConnector, MemoryRemote, RemoteOp};
pub use provider::{Connector, RemoteEntry, RemoteFs, RemoveOutcome};
pub use sftp::{SftpConnector, SftpRemote};
