// Cirrato PMC client
//
// Wraps the PMC executable. Every operation is one process invocation;
// listings read the whole of stdout, commands only read the first line.
// Arguments are handed to the runner as separate argv entries, never
// through a shell.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::encoding::{OutputEncoding, split_lines};
use crate::error::Error;
use crate::process::{ProcessRunner, TokioProcessRunner};

/// Raw client for the Cirrato PMC command-line tool.
#[derive(Clone)]
pub struct PmcClient {
    program: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl std::fmt::Debug for PmcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PmcClient")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl PmcClient {
    /// Create a client that spawns `program` with the given runner.
    pub fn new(program: impl Into<PathBuf>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Create a client backed by real `tokio::process` invocations.
    pub fn with_default_runner(
        program: impl Into<PathBuf>,
        timeout: Option<std::time::Duration>,
    ) -> Self {
        Self::new(program, Arc::new(TokioProcessRunner::new(timeout)))
    }

    /// Path of the PMC executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the configured executable exists on disk.
    pub fn exists(&self) -> bool {
        self.program.is_file()
    }

    // ── Invocation helpers ───────────────────────────────────────────

    /// Run the PMC and return every stdout line.
    pub(crate) async fn lines(
        &self,
        args: &[String],
        encoding: OutputEncoding,
    ) -> Result<Vec<String>, Error> {
        debug!("pmc {}", display_args(args));
        let output = self.runner.run(&self.program, args).await?;
        let text = encoding.decode(&output.stdout);
        Ok(split_lines(&text))
    }

    /// Run the PMC and return the first stdout line, or an empty string
    /// if it printed nothing.
    pub(crate) async fn first_line(&self, args: &[String]) -> Result<String, Error> {
        let lines = self.lines(args, OutputEncoding::Utf8).await?;
        let first = lines.into_iter().next().unwrap_or_default();
        debug!(result = %first, "pmc finished");
        Ok(first)
    }
}

/// Build an owned argv from string slices.
pub(crate) fn argv<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.into_iter().map(String::from).collect()
}

/// Render an argv for logging with the login password masked.
fn display_args(args: &[String]) -> String {
    let redact = args.first().is_some_and(|a| a == "login");
    let mut rendered = Vec::with_capacity(args.len());
    let mut mask_next = false;
    for arg in args {
        if mask_next {
            rendered.push("********".to_owned());
            mask_next = false;
            continue;
        }
        mask_next = redact && arg == "-p";
        if arg.contains(' ') {
            rendered.push(format!("\"{arg}\""));
        } else {
            rendered.push(arg.clone());
        }
    }
    rendered.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_password_is_masked() {
        let args = argv(["login", "-d", "CORP", "-u", "alice", "-p", "hunter2"]);
        assert_eq!(display_args(&args), "login -d CORP -u alice -p ********");
    }

    #[test]
    fn path_flag_outside_login_is_kept() {
        let args = argv(["region", "list", "-p", "/", "--verbose"]);
        assert_eq!(display_args(&args), "region list -p / --verbose");
    }

    #[test]
    fn arguments_with_spaces_are_quoted_for_display() {
        let args = argv(["printer", "add", "--comment", "Color printer"]);
        assert_eq!(display_args(&args), "printer add --comment \"Color printer\"");
    }
}
