//! Host platform check

use dialoguer::Confirm;

use crate::error::{CliError, Result};

/// Operating system the tool is built and tested for.
pub const EXPECTED_OS: &str = "linux";

/// Whether running on `os` needs an explicit go-ahead from the user.
pub fn needs_confirmation(os: &str) -> bool {
    os != EXPECTED_OS
}

/// Ask before continuing on an unexpected operating system.
///
/// Returns immediately on Linux or when `assume_yes` is set.
pub fn confirm_platform(assume_yes: bool) -> Result<()> {
    let os = std::env::consts::OS;
    if assume_yes || !needs_confirmation(os) {
        return Ok(());
    }

    tracing::warn!(os, "Running on an unsupported platform");
    let proceed = Confirm::new()
        .with_prompt(format!(
            "This tool was designed for Linux (detected OS: {os:?}). Continue anyway?"
        ))
        .default(true)
        .interact()?;

    if proceed {
        Ok(())
    } else {
        Err(CliError::user("Aborted on unsupported platform"))
    }
}
