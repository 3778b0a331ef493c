//! PMC login.
//!
//! The PMC keeps its session between invocations, so this is the one
//! command that talks to the PMC without loading the directory first.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::SecretString;

use printsync_core::Controller;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, Secret};
use crate::error::CliError;
use crate::output;

use super::util;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Flag value, then profile value, then an interactive prompt.
fn value_or_prompt(
    flag: Option<String>,
    stored: Option<&String>,
    prompt: &str,
    allow_empty: bool,
) -> Result<String, CliError> {
    if let Some(value) = flag.or_else(|| stored.cloned()) {
        return Ok(value);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::LoginRequired);
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(allow_empty)
        .interact_text()
        .map_err(prompt_err)
}

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (controller_config, profile) = config::pmc_only_config(global)?;
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    let domain = value_or_prompt(args.domain, profile.domain.as_ref(), "Domain", true)?;
    let username = value_or_prompt(args.username, profile.username.as_ref(), "Username", false)?;

    let password = match config::resolve_secret(
        Secret::PmcPassword,
        &profile_name,
        profile.password.as_deref(),
    ) {
        Some(secret) => secret,
        None => {
            if !std::io::stdin().is_terminal() {
                return Err(CliError::NoCredentials {
                    profile: profile_name,
                    what: Secret::PmcPassword.label().into(),
                });
            }
            let raw = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            SecretString::from(raw)
        }
    };

    let controller = Controller::new(controller_config);
    let bar = util::spinner("Logging in...", global);
    let outcome = controller.login(&domain, &username, &password).await;
    bar.finish_and_clear();

    let outcome = outcome?;
    if !outcome.is_success() {
        return Err(CliError::LoginFailed {
            message: outcome.message(),
        });
    }
    if !global.quiet {
        let color = output::should_color(&global.color);
        eprintln!("{}", output::success(&outcome.message(), color));
    }
    Ok(())
}
