//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use printsync_core::{Controller, Printer};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Look a printer up by exact name in the current snapshot.
pub fn find_printer(controller: &Controller, name: &str) -> Result<Arc<Printer>, CliError> {
    controller
        .printers_snapshot()
        .iter()
        .find(|p| p.name == name)
        .cloned()
        .ok_or_else(|| CliError::NotFound {
            resource_type: "printer".into(),
            identifier: name.into(),
            list_command: "printers list".into(),
        })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "confirmation".into(),
            reason: "not a terminal; pass --yes (-y) to confirm".into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Spinner on stderr while a slow step runs. Hidden for quiet runs and
/// when stderr is not a terminal.
pub fn spinner(message: &str, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Print per-backend status lines to stderr and turn collected backend
/// errors into a `PartialFailure`.
pub fn finish_report(
    operation: &str,
    successes: &[String],
    errors: &[String],
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    if !global.quiet {
        for line in successes {
            eprintln!("{}", output::success(line, color));
        }
    }
    for line in errors {
        eprintln!("{}", output::failure(line, color));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            operation: operation.into(),
            details: errors.join("\n"),
        })
    }
}
