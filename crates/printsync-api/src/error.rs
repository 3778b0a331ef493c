use thiserror::Error;

/// Top-level error type for the `printsync-api` crate.
///
/// Covers every failure mode of both collaborators: the SysMan HTTP API
/// and the Cirrato PMC process. `printsync-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// SysMan rejected the request credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── SysMan API ──────────────────────────────────────────────────
    /// Non-success HTTP status from SysMan.
    #[error("SysMan API error (HTTP {status}): {message}")]
    SysMan { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── PMC process ─────────────────────────────────────────────────
    /// The PMC executable could not be started.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The PMC process did not exit before the configured timeout.
    #[error("{program} did not finish within {timeout_secs}s")]
    ProcessTimeout { program: String, timeout_secs: u64 },

    /// The PMC printed an `[ERROR]` line while producing a listing.
    #[error("Cirrato PMC error: {line}")]
    Pmc { line: String },
}

impl Error {
    /// Returns `true` if this error indicates rejected credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::SysMan { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Returns `true` if the request or process ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::ProcessTimeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::SysMan { status: 404, .. } => true,
            _ => false,
        }
    }
}
