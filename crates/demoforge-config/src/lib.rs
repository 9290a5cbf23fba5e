//! Shared configuration for the demoforge CLI.
//!
//! TOML profiles plus `DEMOFORGE_` environment overrides, and
//! translation into `demoforge_core` deploy settings. The CLI adds
//! flag-aware resolution on top of this crate.

use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use demoforge_core::{
    DEFAULT_BASE_URL, DEFAULT_SITES_ROOT, DeployConfig, GitPublisher, PublishPolicy,
};

/// Template file used when neither flag nor profile names one.
pub const DEFAULT_TEMPLATE: &str = "template.html";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

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
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named deploy profiles.
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
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named deploy profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Directory holding one subdirectory per deployed site.
    #[serde(default = "default_sites_root")]
    pub sites_root: PathBuf,

    /// URL prefix deployed sites are reachable under.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Template file rendered for each deploy.
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Publish failure handling: "best-effort", "strict", or "disabled".
    #[serde(default)]
    pub publish: PublishPolicy,

    /// Remote to push to. Unset means git's upstream configuration.
    pub remote: Option<String>,

    /// Branch to push. Only meaningful together with `remote`.
    pub branch: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            sites_root: default_sites_root(),
            base_url: default_base_url(),
            template: default_template(),
            publish: PublishPolicy::default(),
            remote: None,
            branch: None,
        }
    }
}

fn default_sites_root() -> PathBuf {
    PathBuf::from(DEFAULT_SITES_ROOT)
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_template() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE)
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "demoforge", "demoforge").map_or_else(
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
    p.push("demoforge");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    // Keys themselves contain underscores (sites_root), so nesting uses
    // a double underscore: DEMOFORGE_PROFILES__CI__PUBLISH=strict.
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("DEMOFORGE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Translation to core settings ────────────────────────────────────

/// Build a `DeployConfig` from a profile — no CLI flag overrides.
pub fn profile_to_deploy_config(profile: &Profile) -> Result<DeployConfig, ConfigError> {
    let base_url = parse_base_url(&profile.base_url)?;
    Ok(DeployConfig {
        sites_root: profile.sites_root.clone(),
        base_url,
        publish: profile.publish,
    })
}

/// Build the git publisher for a profile's push target.
pub fn profile_to_publisher(profile: &Profile) -> GitPublisher {
    GitPublisher::with_target(profile.remote.clone(), profile.branch.clone())
}

/// Parse and vet a base URL from config or flag input.
pub fn parse_base_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("URL cannot take a path segment: {raw}"),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.profiles.is_empty());
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.color, "auto");
    }

    #[test]
    fn profile_fields_default_individually() {
        let config: Config = toml::from_str(
            r#"
            [profiles.default]
            base_url = "https://demos.acme.dev/"
            "#,
        )
        .unwrap();
        let profile = &config.profiles["default"];
        assert_eq!(profile.base_url, "https://demos.acme.dev/");
        assert_eq!(profile.sites_root, PathBuf::from("sites"));
        assert_eq!(profile.template, PathBuf::from("template.html"));
        assert_eq!(profile.publish, PublishPolicy::BestEffort);
    }

    #[test]
    fn publish_policy_parses_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [profiles.ci]
            publish = "strict"
            remote = "origin"
            branch = "main"
            "#,
        )
        .unwrap();
        let profile = &config.profiles["ci"];
        assert_eq!(profile.publish, PublishPolicy::Strict);
        assert_eq!(profile.remote.as_deref(), Some("origin"));
        assert_eq!(profile.branch.as_deref(), Some("main"));
    }

    #[test]
    fn translation_carries_profile_settings() {
        let profile = Profile {
            sites_root: PathBuf::from("out/sites"),
            base_url: "https://demos.acme.dev".into(),
            publish: PublishPolicy::Disabled,
            ..Profile::default()
        };
        let deploy = profile_to_deploy_config(&profile).unwrap();
        assert_eq!(deploy.sites_root, PathBuf::from("out/sites"));
        assert_eq!(deploy.base_url.as_str(), "https://demos.acme.dev/");
        assert_eq!(deploy.publish, PublishPolicy::Disabled);
    }

    #[test]
    fn translation_rejects_malformed_base_url() {
        let profile = Profile {
            base_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_deploy_config(&profile).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn translation_rejects_pathless_base_url() {
        let profile = Profile {
            base_url: "mailto:demos@example.com".into(),
            ..Profile::default()
        };
        let err = profile_to_deploy_config(&profile).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.profiles.insert("default".into(), Profile::default());
        let text = toml::to_string_pretty(&config).unwrap();
        let reparsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(reparsed.default_profile.as_deref(), Some("default"));
        assert!(reparsed.profiles.contains_key("default"));
    }
}
