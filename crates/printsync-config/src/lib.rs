//! Shared configuration for the printsync CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `printsync_core::ControllerConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use printsync_core::{BasicCredentials, ControllerConfig, PmcCredentials, TlsVerification};

/// Service name under which secrets are kept in the system keyring.
pub const KEYRING_SERVICE: &str = "printsync";

/// Prefix for environment overrides of config keys and secrets.
pub const ENV_PREFIX: &str = "PRINTSYNC_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured for profile '{profile}'")]
    NoCredentials { profile: String, what: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named site profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named profile: one Cirrato installation and its SysMan service.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Path of the Cirrato PMC executable.
    #[serde(default)]
    pub pmc_path: PathBuf,

    /// SysMan service URL (e.g., "https://sysman.corp.local/SysMan/").
    #[serde(default)]
    pub sysman_url: String,

    /// Group whose members may modify printers. Empty allows everyone.
    #[serde(default)]
    pub access_group: String,

    /// Domain for PMC login.
    pub domain: Option<String>,

    /// Username for PMC login.
    pub username: Option<String>,

    /// Password for PMC login (plaintext, prefer keyring).
    pub password: Option<String>,

    /// Username for SysMan basic auth.
    pub sysman_username: Option<String>,

    /// Password for SysMan basic auth (plaintext, prefer keyring).
    pub sysman_password: Option<String>,

    /// Path to a custom CA certificate for SysMan.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid SysMan certificates.
    pub insecure: Option<bool>,

    /// HTTP timeout in seconds.
    pub timeout: Option<u64>,

    /// Upper bound for one PMC invocation in seconds.
    pub pmc_timeout: Option<u64>,
}

// ── Secrets ─────────────────────────────────────────────────────────

/// A secret a profile may need, with its env var and keyring entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secret {
    PmcPassword,
    SysManPassword,
}

impl Secret {
    pub fn env_var(self) -> &'static str {
        match self {
            Self::PmcPassword => "PRINTSYNC_PASSWORD",
            Self::SysManPassword => "PRINTSYNC_SYSMAN_PASSWORD",
        }
    }

    /// Keyring account for this secret under `profile_name`.
    pub fn keyring_key(self, profile_name: &str) -> String {
        match self {
            Self::PmcPassword => format!("{profile_name}/password"),
            Self::SysManPassword => format!("{profile_name}/sysman-password"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PmcPassword => "PMC password",
            Self::SysManPassword => "SysMan password",
        }
    }
}

/// Store a secret in the system keyring.
pub fn store_secret(secret: Secret, profile_name: &str, value: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &secret.keyring_key(profile_name))
        .map_err(|e| ConfigError::Keyring(format!("failed to access keyring: {e}")))?;
    entry.set_password(value).map_err(|e| {
        ConfigError::Keyring(format!("failed to store {} in keyring: {e}", secret.label()))
    })
}

/// Resolve a secret: env var, then keyring, then the plaintext value.
pub fn resolve_secret(
    secret: Secret,
    profile_name: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    if let Ok(val) = std::env::var(secret.env_var()) {
        return Some(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &secret.keyring_key(profile_name)) {
        if let Ok(val) = entry.get_password() {
            return Some(SecretString::from(val));
        }
    }

    plaintext.map(SecretString::from)
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "printsync", "printsync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("printsync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file yields
/// the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// PMC login credentials, when the profile names a user.
///
/// `None` means the session must already be logged in; a username
/// without any password source is an error.
pub fn resolve_pmc_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<PmcCredentials>, ConfigError> {
    let Some(username) = profile
        .username
        .clone()
        .or_else(|| std::env::var("PRINTSYNC_USERNAME").ok())
    else {
        return Ok(None);
    };

    let password = resolve_secret(
        Secret::PmcPassword,
        profile_name,
        profile.password.as_deref(),
    )
    .ok_or_else(|| ConfigError::NoCredentials {
        profile: profile_name.into(),
        what: Secret::PmcPassword.label().into(),
    })?;

    let domain = profile
        .domain
        .clone()
        .or_else(|| std::env::var("PRINTSYNC_DOMAIN").ok())
        .unwrap_or_default();

    Ok(Some(PmcCredentials {
        domain,
        username,
        password,
    }))
}

/// SysMan basic credentials, when the profile names a SysMan user.
pub fn resolve_sysman_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<BasicCredentials>, ConfigError> {
    let Some(username) = profile
        .sysman_username
        .clone()
        .or_else(|| std::env::var("PRINTSYNC_SYSMAN_USERNAME").ok())
    else {
        return Ok(None);
    };

    let password = resolve_secret(
        Secret::SysManPassword,
        profile_name,
        profile.sysman_password.as_deref(),
    )
    .ok_or_else(|| ConfigError::NoCredentials {
        profile: profile_name.into(),
        what: Secret::SysManPassword.label().into(),
    })?;

    Ok(Some(BasicCredentials { username, password }))
}

/// Parse and check the profile's SysMan URL.
pub fn parse_sysman_url(raw: &str) -> Result<url::Url, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "sysman_url".into(),
            reason: "no SysMan URL configured".into(),
        });
    }
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "sysman_url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// TLS strategy from the profile's `insecure` and `ca_cert` fields.
pub fn tls_for(profile: &Profile, insecure_override: bool) -> TlsVerification {
    if insecure_override || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `ControllerConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ControllerConfig, ConfigError> {
    if profile.pmc_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            field: "pmc_path".into(),
            reason: "no PMC executable configured".into(),
        });
    }
    let url = parse_sysman_url(&profile.sysman_url)?;

    let mut config = ControllerConfig::new(profile.pmc_path.clone(), url);
    config.access_group.clone_from(&profile.access_group);
    config.pmc_credentials = resolve_pmc_credentials(profile, profile_name)?;
    config.sysman_credentials = resolve_sysman_credentials(profile, profile_name)?;
    config.tls = tls_for(profile, false);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));
    config.pmc_timeout = profile.pmc_timeout.map(Duration::from_secs);
    Ok(config)
}
