//! CLI configuration — thin wrapper around `demoforge_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--sites-root, --base-url, ...).

use clap::ValueEnum;

use demoforge_core::DeployConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use demoforge_config::{
    Config, Profile, config_path, load_config_or_default, parse_base_url, profile_to_publisher,
    save_config,
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

/// Look up the active profile.
///
/// A profile named via `--profile` (or `DEMOFORGE_PROFILE`) must exist;
/// the implicit default quietly falls back to built-in settings when no
/// profile is configured yet.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    if let Some(profile) = config.profiles.get(&name) {
        return Ok((name, profile.clone()));
    }
    if global.profile.is_some() {
        let mut available: Vec<_> = config.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }
    Ok((name, Profile::default()))
}

/// Translate a `Profile` + global flags into a `DeployConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_deploy_config(
    profile: &Profile,
    global: &GlobalOpts,
) -> Result<DeployConfig, CliError> {
    let mut config = demoforge_config::profile_to_deploy_config(profile)?;

    // Sites root (flag > env > profile)
    if let Some(root) = &global.sites_root {
        config.sites_root.clone_from(root);
    }

    // Base URL (flag > env > profile)
    if let Some(raw) = &global.base_url {
        config.base_url = parse_base_url(raw)?;
    }

    Ok(config)
}

/// Resolve the output format: flag/env, then config defaults, then table.
pub fn resolve_output(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if let Some(format) = &global.output {
        return format.clone();
    }
    OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
}

/// Resolve the color mode: flag/env, then config defaults, then auto.
pub fn resolve_color(global: &GlobalOpts, config: &Config) -> ColorMode {
    if let Some(mode) = &global.color {
        return mode.clone();
    }
    ColorMode::from_str(&config.defaults.color, true).unwrap_or(ColorMode::Auto)
}
