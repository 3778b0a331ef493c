// ── Runtime session configuration ──
//
// These types describe *how* to reach Cirrato and SysMan for one session.
// They carry credential data and connection tuning, but never touch disk.
// The CLI constructs a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

pub use printsync_api::BasicCredentials;

/// PMC login credentials, used when the PMC session is not logged in.
#[derive(Debug, Clone)]
pub struct PmcCredentials {
    pub domain: String,
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy for SysMan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed internal hosts).
    DangerAcceptInvalid,
}

/// Configuration for one printsync session.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Path of the Cirrato PMC executable.
    pub pmc_path: PathBuf,
    /// SysMan service URL (e.g., `https://sysman.corp.local/SysMan/`).
    pub sysman_url: Url,
    /// Access group as a distinguished name or plain name. Empty grants
    /// full access to everyone.
    pub access_group: String,
    /// Credentials for logging the PMC in when needed.
    pub pmc_credentials: Option<PmcCredentials>,
    /// Optional HTTP basic credentials for SysMan.
    pub sysman_credentials: Option<BasicCredentials>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Upper bound for a single PMC invocation. `None` waits forever.
    pub pmc_timeout: Option<Duration>,
}

impl ControllerConfig {
    pub fn new(pmc_path: impl Into<PathBuf>, sysman_url: Url) -> Self {
        Self {
            pmc_path: pmc_path.into(),
            sysman_url,
            access_group: String::new(),
            pmc_credentials: None,
            sysman_credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            pmc_timeout: None,
        }
    }
}
