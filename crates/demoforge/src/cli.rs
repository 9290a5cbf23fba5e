//! Clap derive structures for the `demoforge` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// demoforge -- deploy personalized demo sites from a template
#[derive(Debug, Parser)]
#[command(
    name = "demoforge",
    version,
    about = "Deploy personalized demo sites for sales leads",
    long_about = "Renders a static HTML template with per-lead placeholder values,\n\
        writes the page plus a deployment record into a per-lead directory,\n\
        and publishes the result with plain git.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Deploy profile to use
    #[arg(long, short = 'p', env = "DEMOFORGE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Sites root directory (overrides profile)
    #[arg(long, env = "DEMOFORGE_SITES_ROOT", global = true)]
    pub sites_root: Option<PathBuf>,

    /// Base URL deployed sites are reachable under (overrides profile)
    #[arg(long, env = "DEMOFORGE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "DEMOFORGE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, env = "DEMOFORGE_COLOR", global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deploy a personalized demo site for a lead
    #[command(alias = "d")]
    Deploy(DeployArgs),

    /// Inspect deployed sites
    Sites(SitesArgs),

    /// Manage configuration
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Deploy ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Lead name the site is personalized for
    pub lead_name: String,

    /// Industry placeholder value
    #[arg(default_value = "your industry")]
    pub industry: String,

    /// Template file to render (defaults to the profile's template)
    #[arg(long, short = 't', env = "DEMOFORGE_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Extra placeholder value, repeatable (overrides built-ins)
    #[arg(long, value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Skip the git publish step
    #[arg(long)]
    pub no_publish: bool,

    /// Fail the deploy if any git step fails
    #[arg(long, conflicts_with = "no_publish")]
    pub strict_publish: bool,
}

// ── Sites ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List deployed sites
    #[command(alias = "ls")]
    List,

    /// Show one deployed site in detail
    Show {
        /// Site identifier or the lead name it was deployed for
        site: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (sites_root, base_url, template, publish, remote, branch)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
