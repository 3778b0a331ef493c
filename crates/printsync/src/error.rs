//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use printsync_config::ConfigError;
use printsync_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(printsync::connection_failed),
        help(
            "Check that SysMan is running and reachable.\n\
             Use --insecure (-k) for self-signed certificates, or configure ca_cert."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not connect to SysMan at {url}")]
    #[diagnostic(
        code(printsync::sysman_unavailable),
        help(
            "The service did not answer with HTTP 200.\n\
             Check the URL: printsync config set sysman_url <url>"
        )
    )]
    SysManUnavailable { url: String },

    #[error("Cirrato PMC not found at {path}")]
    #[diagnostic(
        code(printsync::pmc_not_found),
        help(
            "Point printsync at the PMC executable:\n\
             printsync config set pmc_path <path>  (or --pmc-path)"
        )
    )]
    PmcNotFound { path: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not logged in to Cirrato PMC")]
    #[diagnostic(
        code(printsync::login_required),
        help(
            "Log in with: printsync login\n\
             Or configure username and password in your profile to log in automatically."
        )
    )]
    LoginRequired,

    #[error("Login failed: {message}")]
    #[diagnostic(code(printsync::login_failed))]
    LoginFailed { message: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(printsync::no_credentials),
        help("Store it with: printsync config set-password --profile {profile}")
    )]
    NoCredentials { profile: String, what: String },

    #[error("Read-only access: cannot {operation}")]
    #[diagnostic(
        code(printsync::read_only),
        help("Changes require membership in the configured access group.")
    )]
    ReadOnly { operation: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(printsync::not_found),
        help("Run: printsync {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists in {system}")]
    #[diagnostic(code(printsync::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
        system: String,
    },

    // ── Backends ─────────────────────────────────────────────────────

    #[error("Cirrato PMC error: {message}")]
    #[diagnostic(code(printsync::pmc))]
    Pmc { message: String },

    #[error("{message}")]
    #[diagnostic(code(printsync::operation_failed))]
    OperationFailed { message: String },

    #[error("{operation} finished with errors")]
    #[diagnostic(
        code(printsync::partial_failure),
        help("{details}\nNothing was rolled back; run the command again or fix the printer by hand.")
    )]
    PartialFailure { operation: String, details: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(printsync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(printsync::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: printsync config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(printsync::no_config),
        help(
            "Create one with: printsync config init\n\
             Expected at: {path}\n\
             Or pass --pmc-path and --sysman-url."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(printsync::config))]
    Config { message: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Timed out after {seconds}s")]
    #[diagnostic(
        code(printsync::timeout),
        help("Increase --timeout or --pmc-timeout, or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Internal / IO ────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    #[diagnostic(code(printsync::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. }
            | Self::SysManUnavailable { .. }
            | Self::PmcNotFound { .. } => exit_code::CONNECTION,
            Self::LoginRequired | Self::LoginFailed { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::ReadOnly { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::SysManUnavailable { url } => CliError::SysManUnavailable { url },

            CoreError::PmcNotFound { path } => CliError::PmcNotFound { path },

            CoreError::ControllerDisconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                source: "Controller connection was lost".into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::LoginRequired => CliError::LoginRequired,

            CoreError::LoginFailed { message } => CliError::LoginFailed { message },

            CoreError::Pmc { message } => CliError::Pmc { message },

            CoreError::ReadOnly { operation } => CliError::ReadOnly { operation },

            CoreError::PrinterNotFound { identifier } => CliError::NotFound {
                resource_type: "printer".into(),
                identifier,
                list_command: "printers list".into(),
            },

            CoreError::DriverNotFound { name } => CliError::NotFound {
                resource_type: "driver".into(),
                identifier: name,
                list_command: "drivers list".into(),
            },

            CoreError::RegionNotFound { name } => CliError::NotFound {
                resource_type: "region".into(),
                identifier: name,
                list_command: "regions list".into(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::OperationFailed { message } => CliError::OperationFailed { message },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile, what } => {
                CliError::NoCredentials { profile, what }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_exit_codes() {
        let cases = [
            (CoreError::LoginRequired, exit_code::AUTH),
            (
                CoreError::ReadOnly {
                    operation: "delete printer".into(),
                },
                exit_code::PERMISSION,
            ),
            (
                CoreError::PrinterNotFound {
                    identifier: "SE_B1_F2_01".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::SysManUnavailable {
                    url: "http://sysman/".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::ValidationFailed {
                    message: "IP address is invalid.".into(),
                },
                exit_code::USAGE,
            ),
            (CoreError::Timeout { timeout_secs: 30 }, exit_code::TIMEOUT),
        ];
        for (core, code) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), code, "{label}");
        }
    }
}
