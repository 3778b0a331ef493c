// ── External process execution ──
//
// Every PMC call spawns the executable once, writes nothing to stdin and
// collects stdout. The `ProcessRunner` trait is the seam that lets tests
// substitute scripted output for a real process.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, trace, warn};

use crate::error::Error;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Captured stdout is cut off here; the largest listings are a few MB.
const MAX_STDOUT_BYTES: u64 = 32 * 1024 * 1024;
const MAX_STDERR_BYTES: u64 = 64 * 1024;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Convenience constructor for scripted output.
    pub fn from_stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
            exit_code: Some(0),
        }
    }
}

/// Runs an external program to completion.
pub trait ProcessRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        program: &'a Path,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<ProcessOutput, Error>>;
}

/// `tokio::process` backed runner used outside of tests.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    timeout: Option<Duration>,
}

impl TokioProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessRunner for TokioProcessRunner {
    fn run<'a>(
        &'a self,
        program: &'a Path,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<ProcessOutput, Error>> {
        Box::pin(async move {
            let mut cmd = Command::new(program);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                // The child is killed if the output future is dropped on timeout.
                .kill_on_drop(true);

            #[cfg(windows)]
            cmd.creation_flags(CREATE_NO_WINDOW);

            let program_name = program.display().to_string();
            trace!(program = %program_name, "spawning process");

            let output = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, run_capped(&mut cmd))
                    .await
                    .map_err(|_| Error::ProcessTimeout {
                        program: program_name.clone(),
                        timeout_secs: limit.as_secs(),
                    })?,
                None => run_capped(&mut cmd).await,
            }
            .map_err(|source| Error::Spawn {
                program: program_name.clone(),
                source,
            })?;

            if output.stdout_discarded > 0 {
                warn!(
                    program = %program_name,
                    discarded = output.stdout_discarded,
                    "process output exceeded capture limit, truncated"
                );
            }
            if !output.stderr.is_empty() {
                debug!(
                    program = %program_name,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "process wrote to stderr"
                );
            }

            Ok(ProcessOutput {
                stdout: output.stdout,
                stderr: output.stderr,
                exit_code: output.exit_code,
            })
        })
    }
}

struct CappedOutput {
    stdout: Vec<u8>,
    stdout_discarded: u64,
    stderr: Vec<u8>,
    exit_code: Option<i32>,
}

/// Spawn `cmd` and collect its output, keeping at most the capture limit
/// of each stream. The child is killed if this future is dropped.
async fn run_capped(cmd: &mut Command) -> std::io::Result<CappedOutput> {
    let mut child = cmd.spawn()?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let ((stdout, stdout_discarded), (stderr, _), status) = tokio::try_join!(
        read_capped(stdout, MAX_STDOUT_BYTES),
        read_capped(stderr, MAX_STDERR_BYTES),
        child.wait(),
    )?;

    Ok(CappedOutput {
        stdout,
        stdout_discarded,
        stderr,
        exit_code: status.code(),
    })
}

/// Read up to `limit` bytes, then drain the rest so the child never
/// blocks on a full pipe. Returns the kept bytes and the discarded count.
async fn read_capped<R: AsyncRead + Unpin>(
    reader: Option<R>,
    limit: u64,
) -> std::io::Result<(Vec<u8>, u64)> {
    let mut buf = Vec::new();
    let Some(mut reader) = reader else {
        return Ok((buf, 0));
    };
    (&mut reader).take(limit).read_to_end(&mut buf).await?;
    let discarded = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    Ok((buf, discarded))
}
