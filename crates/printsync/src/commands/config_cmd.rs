//! Config subcommand handlers.

use std::collections::HashMap;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile, Secret};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "pmc_path = \"{}\"", p.pmc_path.display());
        let _ = writeln!(out, "sysman_url = \"{}\"", p.sysman_url);
        if !p.access_group.is_empty() {
            let _ = writeln!(out, "access_group = \"{}\"", p.access_group);
        }
        if let Some(ref d) = p.domain {
            let _ = writeln!(out, "domain = \"{d}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref u) = p.sysman_username {
            let _ = writeln!(out, "sysman_username = \"{u}\"");
        }
        if p.sysman_password.is_some() {
            let _ = writeln!(out, "sysman_password = \"****\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(timeout) = p.pmc_timeout {
            let _ = writeln!(out, "pmc_timeout = {timeout}");
        }
    }

    out
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Offer to store a secret in the system keyring or return it for the
/// plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_secret_storage(
    secret: Secret,
    profile_name: &str,
    value: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {}?", secret.label()))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_secret(secret, profile_name, value)?;
        eprintln!("   ✓ {} stored in system keyring", secret.label());
        Ok(None)
    } else {
        Ok(Some(value.to_owned()))
    }
}

/// Prompt for a password; an empty answer means none is stored.
fn prompt_password(
    secret: Secret,
    profile_name: &str,
    prompt: &str,
) -> Result<Option<String>, CliError> {
    let value = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if value.is_empty() {
        return Ok(None);
    }
    prompt_secret_storage(secret, profile_name, &value)
}

fn parse_number(field: &str, value: &str) -> Result<u64, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be a number (seconds)".into(),
    })
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "pmc_path" | "pmc-path" => profile.pmc_path = value.into(),
        "sysman_url" | "sysman-url" => {
            config::parse_sysman_url(&value)?;
            profile.sysman_url = value;
        }
        "access_group" | "access-group" => profile.access_group = value,
        "domain" => profile.domain = Some(value),
        "username" => profile.username = Some(value),
        "sysman_username" | "sysman-username" => profile.sysman_username = Some(value),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => profile.timeout = Some(parse_number("timeout", &value)?),
        "pmc_timeout" | "pmc-timeout" => {
            profile.pmc_timeout = Some(parse_number("pmc_timeout", &value)?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: pmc_path, sysman_url, \
                     access_group, domain, username, sysman_username, insecure, timeout, \
                     pmc_timeout, ca_cert"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("printsync configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let pmc_path: String = Input::new()
                .with_prompt("Path of the PMC executable")
                .interact_text()
                .map_err(prompt_err)?;

            let sysman_url: String = Input::new()
                .with_prompt("SysMan URL")
                .interact_text()
                .map_err(prompt_err)?;
            config::parse_sysman_url(&sysman_url)?;

            let access_group: String = Input::new()
                .with_prompt("Access group (empty allows everyone)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let domain: String = Input::new()
                .with_prompt("PMC login domain (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("PMC username (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            let username = optional(username);
            let password = if username.is_some() {
                prompt_password(Secret::PmcPassword, &profile_name, "PMC password: ")?
            } else {
                None
            };

            let sysman_username: String = Input::new()
                .with_prompt("SysMan username (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            let sysman_username = optional(sysman_username);
            let sysman_password = if sysman_username.is_some() {
                prompt_password(Secret::SysManPassword, &profile_name, "SysMan password: ")?
            } else {
                None
            };

            let profile = Profile {
                pmc_path: pmc_path.into(),
                sysman_url,
                access_group,
                domain: optional(domain),
                username,
                password,
                sysman_username,
                sysman_password,
                ..Profile::default()
            };

            let mut profiles = HashMap::new();
            profiles.insert(profile_name.clone(), profile);

            let cfg = Config {
                default_profile: Some(profile_name.clone()),
                defaults: Defaults::default(),
                profiles,
            };

            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: printsync status");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            set_profile_key(profile, &key, value)?;

            save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: printsync config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile, sysman } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            let secret = if sysman {
                Secret::SysManPassword
            } else {
                Secret::PmcPassword
            };

            let value = rpassword::prompt_password(format!("{}: ", secret.label()))
                .map_err(prompt_err)?;
            if value.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            config::store_secret(secret, &profile_name, &value)?;
            eprintln!(
                "✓ {} stored in keyring for profile '{profile_name}'",
                secret.label()
            );
            Ok(())
        }
    }
}
