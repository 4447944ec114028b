//! Handlers for each CLI command.
//!
//! Handlers write user-facing lines to `out` and return errors to `main`,
//! which owns the exit code.

use std::io::Write;

use alelo_core::api::ApiClient;
use alelo_core::auth::{AuthOutcome, AuthenticationFlow};
use alelo_core::config::{Config, Source, DEFAULT_CARD_VAR, DEFAULT_PROFILE_VAR, HOME_VAR};
use alelo_core::Error;
use anyhow::{bail, Context, Result};

use crate::cli::ProfileCommand;
use crate::prompt::TerminalCredentials;

const NO_PROFILES: &str = "No profiles created";

fn default_profile_display(config: &Config) -> &str {
    config.default_profile.as_deref().unwrap_or(NO_PROFILES)
}

pub async fn run_profile(config: &Config, action: ProfileCommand, out: &mut impl Write) -> Result<()> {
    match action {
        ProfileCommand::List => list(config, out),
        ProfileCommand::Create { name } => create(config, &name, out),
        ProfileCommand::Delete { name } => delete(config, &name, out),
        ProfileCommand::Select { name } => select(config, &name, out),
        ProfileCommand::Current => current(config, out),
        ProfileCommand::Authenticate { name } => {
            let name = name
                .or_else(|| config.default_profile.clone())
                .unwrap_or_default();
            authenticate(config, &name, out).await
        }
    }
}

fn list(config: &Config, out: &mut impl Write) -> Result<()> {
    let names = config.store().list_names()?;
    writeln!(out, "[+] Available profiles:")?;
    for name in names {
        if config.default_profile.as_deref() == Some(name.as_str()) {
            writeln!(out, " - {} (Current default profile)", name)?;
        } else {
            writeln!(out, " - {}", name)?;
        }
    }
    Ok(())
}

fn create(config: &Config, name: &str, out: &mut impl Write) -> Result<()> {
    let profile = config.store().create(name)?;
    writeln!(
        out,
        "[+] Profile {} created under current ALELO_HOME ({})",
        profile.name,
        config.home_dir.display()
    )?;
    Ok(())
}

fn delete(config: &Config, name: &str, out: &mut impl Write) -> Result<()> {
    config.store().delete(name)?;
    writeln!(out, "[+] Profile {} removed", name.trim())?;
    Ok(())
}

fn select(config: &Config, name: &str, out: &mut impl Write) -> Result<()> {
    let name = name.trim();
    if !config.store().contains(name) {
        return Err(Error::NotFound(name.to_string()).into());
    }
    writeln!(out, "[+] Run the following to make {} the default profile:", name)?;
    writeln!(out, "export {}={}", DEFAULT_PROFILE_VAR, name)?;
    Ok(())
}

fn current(config: &Config, out: &mut impl Write) -> Result<()> {
    writeln!(out, "[+] Current profile is {}", default_profile_display(config))?;
    Ok(())
}

async fn authenticate(config: &Config, name: &str, out: &mut impl Write) -> Result<()> {
    let store = config.store();
    let transport = ApiClient::new().context("Failed to build HTTP client")?;

    let mut flow = AuthenticationFlow::new(&store, transport, TerminalCredentials);
    match flow.authenticate(name).await? {
        AuthOutcome::AlreadyAuthenticated(profile) => {
            writeln!(
                out,
                "[+] Profile {} already authenticated as {}",
                profile.name,
                profile.session.full_name()
            )?;
        }
        AuthOutcome::Authenticated(profile) => {
            writeln!(
                out,
                "[+] {} authenticated on profile {}",
                profile.session.full_name(),
                profile.name
            )?;
            writeln!(out, "[+] Profile authenticated and good to go!")?;
        }
    }
    Ok(())
}

/// Bare `alelo`: check that a profile can be selected and report it.
pub fn status(config: &Config, verbose: bool, out: &mut impl Write) -> Result<()> {
    let store = config.store();
    let names = store.list_names()?;
    if names.is_empty() {
        bail!("No profiles found, create one first! Try --help");
    }

    let Some(selected) = config.default_profile.as_deref() else {
        bail!("More than one profile found! Try --help");
    };

    if verbose {
        writeln!(out, "[VERBOSE] Selected profile {}", selected)?;
    }

    let profile = store.load(selected)?;
    if profile.is_authenticated() {
        writeln!(
            out,
            "[+] Profile {} is authenticated as {}",
            profile.name,
            profile.session.full_name()
        )?;
    } else {
        writeln!(
            out,
            "[!] Profile {} has no session, run `alelo profile authenticate {}`",
            profile.name, profile.name
        )?;
    }
    Ok(())
}

/// `--env`: the three variables and the values in effect.
pub fn show_env(config: &Config, out: &mut impl Write) -> Result<()> {
    writeln!(out, "[+] Application environment variables:")?;

    let home = config.home_dir.display().to_string();
    let card = config
        .default_card
        .as_deref()
        .unwrap_or("Card not found, check if you have a active profile session");

    for (var, source, value) in [
        (HOME_VAR, config.home_source, home.as_str()),
        (DEFAULT_PROFILE_VAR, config.profile_source, default_profile_display(config)),
        (DEFAULT_CARD_VAR, config.card_source, card),
    ] {
        match source {
            Source::Environment => writeln!(out, " > {} {}", var, value)?,
            Source::Default => writeln!(out, " > {} is empty, default value in use: {}", var, value)?,
        }
    }
    Ok(())
}
