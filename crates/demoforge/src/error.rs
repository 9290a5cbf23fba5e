//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use demoforge_config::ConfigError;
use demoforge_core::{CoreError, PublishError};

/// Exit codes per the CLI contract.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const TEMPLATE: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PUBLISH: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Template ─────────────────────────────────────────────────────

    #[error("Template file {path} not found")]
    #[diagnostic(
        code(demoforge::template_missing),
        help(
            "Create {path}, or point --template at an existing file.\n\
             Placeholders look like {{{{company_name}}}}."
        )
    )]
    TemplateMissing { path: String },

    #[error("Could not read template {path}")]
    #[diagnostic(code(demoforge::template_read))]
    TemplateRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Deployment ───────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(demoforge::deploy))]
    Deploy(CoreError),

    #[error("Publishing failed")]
    #[diagnostic(
        code(demoforge::publish),
        help(
            "The site files are written; fix the git state and redeploy,\n\
             or rerun with --no-publish."
        )
    )]
    Publish(#[source] PublishError),

    // ── Resources ────────────────────────────────────────────────────

    #[error("Site '{identifier}' has no deployment record")]
    #[diagnostic(
        code(demoforge::site_not_found),
        help("Run: demoforge sites list to see deployed sites")
    )]
    SiteNotFound { identifier: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(demoforge::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(demoforge::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: demoforge config set sites_root sites --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(demoforge::config))]
    Config(Box<figment::Error>),

    #[error("Could not write configuration: {0}")]
    #[diagnostic(code(demoforge::config_write))]
    ConfigWrite(#[source] toml::ser::Error),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TemplateMissing { .. } | Self::TemplateRead { .. } => exit_code::TEMPLATE,
            Self::SiteNotFound { .. } => exit_code::NOT_FOUND,
            Self::Publish(_) => exit_code::PUBLISH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Publish(source) => Self::Publish(source),
            other => Self::Deploy(other),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Figment(source) => Self::Config(source),
            ConfigError::Serialization(source) => Self::ConfigWrite(source),
            ConfigError::Io(source) => Self::Io(source),
        }
    }
}
