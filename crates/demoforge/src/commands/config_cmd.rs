//! Config subcommand handlers.

use demoforge_core::PublishPolicy;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display as TOML-shaped text.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "sites_root = \"{}\"", p.sites_root.display());
        let _ = writeln!(out, "base_url = \"{}\"", p.base_url);
        let _ = writeln!(out, "template = \"{}\"", p.template.display());
        let _ = writeln!(out, "publish = \"{}\"", p.publish);
        if let Some(ref remote) = p.remote {
            let _ = writeln!(out, "remote = \"{remote}\"");
        }
        if let Some(ref branch) = p.branch {
            let _ = writeln!(out, "branch = \"{branch}\"");
        }
    }

    out
}

/// Delegate to the shared config crate's save function.
fn save(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn sorted_profile_names(cfg: &Config) -> Vec<String> {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    names
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let format = config::resolve_output(global, &cfg);
            let out = output::render_single(&format, &cfg, format_config, |_| "config".into());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "sites_root" | "sites-root" => profile.sites_root = value.into(),
                "base_url" | "base-url" => {
                    config::parse_base_url(&value)?;
                    profile.base_url = value;
                }
                "template" => profile.template = value.into(),
                "publish" => {
                    profile.publish = match value.as_str() {
                        "best-effort" => PublishPolicy::BestEffort,
                        "strict" => PublishPolicy::Strict,
                        "disabled" => PublishPolicy::Disabled,
                        _ => {
                            return Err(CliError::Validation {
                                field: "publish".into(),
                                reason: "must be 'best-effort', 'strict', or 'disabled'".into(),
                            });
                        }
                    };
                }
                "remote" => profile.remote = Some(value),
                "branch" => profile.branch = Some(value),
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: sites_root, base_url, \
                             template, publish, remote, branch"
                        ),
                    });
                }
            }

            save(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: demoforge config set sites_root sites");
            } else {
                for name in sorted_profile_names(&cfg) {
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
                let available = sorted_profile_names(&cfg);
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            save(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
