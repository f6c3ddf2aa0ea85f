//! CLI argument parsing using clap derive

use clap::Parser;
use mirror_remote::ConnectionConfig;

use crate::commands::SyncOptions;

/// Pull the repository in the current directory and mirror the changes
/// onto an SFTP server.
///
/// Connection parameters are read from SFTP_HOST, SFTP_PORT, SFTP_USERNAME
/// and SFTP_PASSWORD. Remote paths are resolved against the directory the
/// SFTP session starts in.
#[derive(Parser, Debug)]
#[command(name = "git-sftp-mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// SFTP server host
    #[arg(long, env = "SFTP_HOST")]
    pub host: String,

    /// SFTP server port
    #[arg(long, env = "SFTP_PORT")]
    pub port: u16,

    /// SFTP user name
    #[arg(long, env = "SFTP_USERNAME")]
    pub username: String,

    /// SFTP password
    #[arg(long, env = "SFTP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Git remote to pull from
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Branch to pull (defaults to the current branch)
    #[arg(long)]
    pub branch: Option<String>,

    /// Pull and show what would be mirrored without connecting
    #[arg(long)]
    pub dry_run: bool,

    /// Do not ask for confirmation on unsupported platforms
    #[arg(short, long)]
    pub yes: bool,
}

impl Cli {
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            connection: ConnectionConfig::new(
                &self.host,
                self.port,
                &self.username,
                &self.password,
            ),
            remote: self.remote.clone(),
            branch: self.branch.clone(),
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const CREDENTIALS: [&str; 9] = [
        "git-sftp-mirror",
        "--host",
        "example.org",
        "--port",
        "2222",
        "--username",
        "deploy",
        "--password",
        "secret",
    ];

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(CREDENTIALS).unwrap();
        let options = cli.sync_options();
        assert_eq!(options.remote, "origin");
        assert_eq!(options.branch, None);
        assert!(!options.dry_run);
        assert_eq!(options.connection.port, 2222);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut args = CREDENTIALS.to_vec();
        args[4] = "not-a-port";
        assert!(Cli::try_parse_from(args).is_err());
    }
}
