//! SFTP backend over libssh2

use std::fs::File;
use std::net::TcpStream;
use std::path::Path;

use mirror_fs::NormalizedPath;
use ssh2::{ErrorCode, Session, Sftp};

use crate::{
    ConnectionConfig, Error, Result,
    provider::{Connector, RemoteEntry, RemoteFs, RemoveOutcome},
};

/// `LIBSSH2_FX_NO_SUCH_FILE`
const FX_NO_SUCH_FILE: i32 = 2;

/// Mode for directories created on the remote.
const DIR_MODE: i32 = 0o755;

/// Opens password-authenticated SFTP sessions.
#[derive(Debug, Clone)]
pub struct SftpConnector {
    config: ConnectionConfig,
}

impl SftpConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }
}

impl Connector for SftpConnector {
    type Remote = SftpRemote;

    fn connect(&self) -> Result<SftpRemote> {
        let config = &self.config;
        tracing::info!(target_host = %config.display_target(), "Connecting");

        let tcp = TcpStream::connect((config.host.as_str(), config.port)).map_err(|source| {
            Error::Connect {
                host: config.host.clone(),
                port: config.port,
                source,
            }
        })?;

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake()?;

        session
            .userauth_password(&config.username, &config.password)
            .map_err(|_| Error::AuthenticationFailed {
                username: config.username.clone(),
            })?;
        if !session.authenticated() {
            return Err(Error::AuthenticationFailed {
                username: config.username.clone(),
            });
        }

        let sftp = session.sftp()?;
        let cwd = sftp.realpath(Path::new("."))?;
        let working_dir = NormalizedPath::new(cwd);
        tracing::debug!(working_dir = %working_dir, "SFTP session open");

        Ok(SftpRemote {
            sftp,
            session,
            working_dir,
        })
    }
}

/// An open SFTP session. Disconnects on drop.
pub struct SftpRemote {
    sftp: Sftp,
    session: Session,
    working_dir: NormalizedPath,
}

fn is_no_such_file(err: &ssh2::Error) -> bool {
    matches!(err.code(), ErrorCode::SFTP(FX_NO_SUCH_FILE))
}

impl RemoteFs for SftpRemote {
    fn working_dir(&self) -> &NormalizedPath {
        &self.working_dir
    }

    fn stat(&mut self, path: &NormalizedPath) -> Result<RemoteEntry> {
        match self.sftp.stat(path.as_ref()) {
            Ok(stat) if stat.is_dir() => Ok(RemoteEntry::Directory),
            Ok(_) => Ok(RemoteEntry::Other),
            Err(e) if is_no_such_file(&e) => Ok(RemoteEntry::Missing),
            Err(e) => Err(e.into()),
        }
    }

    fn create_dir_all(&mut self, path: &NormalizedPath) -> Result<()> {
        for ancestor in path.ancestors_inclusive() {
            match self.stat(&ancestor)? {
                RemoteEntry::Directory => {}
                RemoteEntry::Other => {
                    return Err(Error::NotADirectory {
                        path: ancestor.to_string(),
                    });
                }
                RemoteEntry::Missing => {
                    tracing::debug!(path = %ancestor, "mkdir");
                    self.sftp.mkdir(ancestor.as_ref(), DIR_MODE)?;
                }
            }
        }
        Ok(())
    }

    fn upload(&mut self, local: &NormalizedPath, remote: &NormalizedPath) -> Result<u64> {
        let native = local.to_native();
        let mut source = File::open(&native).map_err(|e| Error::io(&native, e))?;
        let mut target = self.sftp.create(remote.as_ref())?;
        let bytes = std::io::copy(&mut source, &mut target)
            .map_err(|e| Error::io(remote.to_native(), e))?;
        tracing::debug!(local = %local, remote = %remote, bytes, "put");
        Ok(bytes)
    }

    fn remove_file(&mut self, path: &NormalizedPath) -> Result<RemoveOutcome> {
        match self.sftp.unlink(path.as_ref()) {
            Ok(()) => Ok(RemoveOutcome::Removed),
            Err(e) if is_no_such_file(&e) => Ok(RemoveOutcome::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for SftpRemote {
    fn drop(&mut self) {
        if let Err(e) = self.session.disconnect(None, "mirror run finished", None) {
            tracing::warn!(error = %e, "Failed to disconnect cleanly");
        } else {
            tracing::debug!("SFTP session closed");
        }
    }
}
