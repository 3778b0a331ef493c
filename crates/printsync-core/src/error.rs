// ── Core error types ──
//
// User-facing errors from printsync-core. Consumers never see raw HTTP
// statuses or process spawn failures; the `From<printsync_api::Error>`
// impl translates them into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Could not connect to SysMan at {url}")]
    SysManUnavailable { url: String },

    #[error("Cirrato PMC not found at {path}")]
    PmcNotFound { path: String },

    #[error("Controller disconnected")]
    ControllerDisconnected,

    #[error("Timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Not logged in to Cirrato PMC")]
    LoginRequired,

    #[error("Login failed: {message}")]
    LoginFailed { message: String },

    #[error("Cirrato PMC error: {message}")]
    Pmc { message: String },

    #[error("Read-only access: {operation} requires membership in the configured access group")]
    ReadOnly { operation: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Printer not found: {identifier}")]
    PrinterNotFound { identifier: String },

    #[error("Driver not found: {name}")]
    DriverNotFound { name: String },

    #[error("Region not found: {name}")]
    RegionNotFound { name: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<printsync_api::Error> for CoreError {
    fn from(err: printsync_api::Error) -> Self {
        match err {
            printsync_api::Error::Authentication { message } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("SysMan rejected the credentials: {message}"),
            },
            printsync_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::OperationFailed {
                        message: e.to_string(),
                    }
                }
            }
            printsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            printsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            printsync_api::Error::SysMan { status, message } => CoreError::OperationFailed {
                message: format!("SysMan returned HTTP {status}: {message}"),
            },
            printsync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            printsync_api::Error::Spawn { program, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    CoreError::PmcNotFound { path: program }
                } else {
                    CoreError::ConnectionFailed {
                        url: program,
                        reason: source.to_string(),
                    }
                }
            }
            printsync_api::Error::ProcessTimeout { timeout_secs, .. } => {
                CoreError::Timeout { timeout_secs }
            }
            printsync_api::Error::Pmc { line } => CoreError::Pmc { message: line },
        }
    }
}

impl CoreError {
    /// Returns `true` for errors caused by the current session's
    /// permissions or login state.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            Self::LoginRequired | Self::LoginFailed { .. } | Self::ReadOnly { .. }
        )
    }
}
