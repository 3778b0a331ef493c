//! CLI configuration: thin wrapper around `printsync_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--pmc-path, --sysman-url, --insecure, ...).

use std::time::Duration;

use printsync_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use printsync_config::{
    Config, Defaults, Profile, Secret, config_path, load_config_or_default, parse_sysman_url,
    resolve_secret, save_config, store_secret,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Apply flag overrides to a profile (or to an empty one when the config
/// has no such profile).
fn with_overrides(profile: Option<&Profile>, global: &GlobalOpts) -> Profile {
    let mut profile = profile.cloned().unwrap_or_default();
    if let Some(ref path) = global.pmc_path {
        profile.pmc_path.clone_from(path);
    }
    if let Some(ref url) = global.sysman_url {
        profile.sysman_url.clone_from(url);
    }
    if let Some(ref group) = global.access_group {
        profile.access_group.clone_from(group);
    }
    profile
}

/// Build a `ControllerConfig` from the config file, profile, and CLI
/// overrides.
///
/// Flags override profile values; with no profile at all, `--pmc-path`
/// and `--sysman-url` must both be given.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let stored = cfg.profiles.get(&profile_name);

    if stored.is_none() {
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        if global.pmc_path.is_none() || global.sysman_url.is_none() {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    }

    let profile = with_overrides(stored, global);
    let mut config = printsync_config::profile_to_controller_config(&profile, &profile_name)?;

    config.tls = printsync_config::tls_for(&profile, global.insecure || cfg.defaults.insecure);
    config.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout),
    );
    if let Some(secs) = global.pmc_timeout {
        config.pmc_timeout = Some(Duration::from_secs(secs));
    }
    Ok(config)
}

/// PMC path and SysMan URL for commands that only need the PMC, such as
/// `login`. Credentials are not resolved.
pub fn pmc_only_config(global: &GlobalOpts) -> Result<(ControllerConfig, Profile), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let stored = cfg.profiles.get(&profile_name);
    if stored.is_none() && global.pmc_path.is_none() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    let profile = with_overrides(stored, global);
    let url = if profile.sysman_url.trim().is_empty() {
        // Unused by login; any syntactically valid URL will do.
        url::Url::parse("http://localhost/").map_err(|e| CliError::Internal(e.to_string()))?
    } else {
        parse_sysman_url(&profile.sysman_url)?
    };

    let mut config = ControllerConfig::new(profile.pmc_path.clone(), url);
    config.pmc_timeout = global.pmc_timeout.or(profile.pmc_timeout).map(Duration::from_secs);
    Ok((config, profile))
}
