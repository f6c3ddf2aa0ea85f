//! Sync command implementation
//!
//! Pulls the working copy, then mirrors the pulled changes onto the
//! SFTP server (or prints them for a dry run).

use colored::Colorize;

use mirror_core::{ActionPlan, PulledChanges, SyncDriver, SyncReport, plan_all};
use mirror_fs::PathResolver;
use mirror_git::GitWorkingCopy;
use mirror_remote::{ConnectionConfig, SftpConnector};

use crate::error::Result;

/// Everything the sync command needs besides the local root.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub connection: ConnectionConfig,
    pub remote: String,
    pub branch: Option<String>,
    pub dry_run: bool,
}

/// Run the sync command.
///
/// Setup failures (not a repository, pull or connection failure) are
/// returned. Failures of individual files are reported but do not fail the
/// command.
pub fn run_sync(resolver: PathResolver, options: &SyncOptions) -> Result<()> {
    let working_copy = GitWorkingCopy::open(resolver.local_root().to_native())?
        .with_remote(options.remote.clone())
        .with_branch(options.branch.clone());

    let branch_display = options.branch.as_deref().unwrap_or("current branch");
    println!(
        "{} Pulling {} from {}...",
        "=>".blue().bold(),
        branch_display.cyan(),
        options.remote.yellow()
    );

    let driver = SyncDriver::new(resolver);
    let changes = driver.pull(&working_copy)?;

    if options.dry_run {
        print_plan(&changes);
        return Ok(());
    }

    if !changes.records.is_empty() {
        println!(
            "{} Mirroring {} change(s) to {}...",
            "=>".blue().bold(),
            changes.records.len(),
            options.connection.display_target().yellow()
        );
    }

    let connector = SftpConnector::new(options.connection.clone());
    let report = driver.replay(&changes, &connector)?;
    print_report(&report);

    Ok(())
}

fn print_plan(changes: &PulledChanges) {
    if changes.records.is_empty() {
        println!("{} Nothing to sync.", "OK".green().bold());
        return;
    }

    println!("{} Dry run, remote untouched:", "PLAN".yellow().bold());
    for (record, plan) in plan_all(&changes.records) {
        let line = match &plan {
            ActionPlan::Upload { path } => format!("upload {path}"),
            ActionPlan::Delete { path } => format!("delete {path}"),
            ActionPlan::Replace { delete, upload } if delete == upload => {
                format!("replace {upload}")
            }
            ActionPlan::Replace { delete, upload } => {
                format!("delete {delete}, upload {upload}")
            }
            ActionPlan::Noop(reason) => format!("skip ({reason})"),
        };
        println!("   {} {} {}", "-".yellow(), record.to_string().cyan(), line);
    }
}

fn print_report(report: &SyncReport) {
    if report.is_up_to_date() {
        println!("{} Nothing to sync.", "OK".green().bold());
        return;
    }

    println!(
        "{} Mirrored {} of {} change(s), {} skipped.",
        "OK".green().bold(),
        report.applied,
        report.total,
        report.skipped
    );

    if !report.failed.is_empty() {
        println!("{} Some changes could not be mirrored:", "FAILED".red().bold());
        for failure in &report.failed {
            println!(
                "   {} {} ({}): {}",
                "!".red(),
                failure.path.cyan(),
                failure.kind.to_string().dimmed(),
                failure.error
            );
        }
    }
}
