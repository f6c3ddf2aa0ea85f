//! git-sftp-mirror CLI
//!
//! Pulls the repository in the current directory and replays the pulled
//! changes onto an SFTP server.

mod cli;
mod commands;
mod error;
mod platform;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use error::Result;
use mirror_fs::PathResolver;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
    tracing::debug!("Verbose mode enabled");

    platform::confirm_platform(cli.yes)?;

    let resolver = PathResolver::from_current_dir()?;
    commands::run_sync(resolver, &cli.sync_options())
}
