//! Deploy command handler.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use demoforge_core::{Deployer, Deployment, PublishPolicy};

use crate::cli::{DeployArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Parse repeated `--set KEY=VALUE` pairs.
fn parse_set_pairs(pairs: &[String]) -> Result<Vec<(String, String)>, CliError> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| CliError::Validation {
                    field: "set".into(),
                    reason: format!("expected KEY=VALUE, got '{pair}'"),
                })
        })
        .collect()
}

/// Read the template, mapping a missing file to its own error.
fn read_template(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| {
        let path = path.display().to_string();
        if source.kind() == ErrorKind::NotFound {
            CliError::TemplateMissing { path }
        } else {
            CliError::TemplateRead { path, source }
        }
    })
}

/// Multi-line receipt for table output.
fn format_receipt(deployment: &Deployment, color: bool) -> String {
    use std::fmt::Write;
    let mut out = output::deployed_line(deployment.url.as_str(), color);
    let _ = write!(out, "\n   Site: {}", deployment.site_id);
    let _ = write!(out, "\n   Directory: {}", deployment.site_dir.display());
    let _ = write!(out, "\n   Publish: {}", deployment.publish);
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: DeployArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let (_, profile) = config::active_profile(global, &cfg)?;

    let mut deploy_config = config::resolve_deploy_config(&profile, global)?;
    if args.no_publish {
        deploy_config.publish = PublishPolicy::Disabled;
    } else if args.strict_publish {
        deploy_config.publish = PublishPolicy::Strict;
    }

    let template_path = args.template.as_ref().unwrap_or(&profile.template);
    let template_html = read_template(template_path)?;

    // Built-in placeholders first, so --set pairs can override them.
    let mut customizations = BTreeMap::new();
    customizations.insert("company_name".to_owned(), args.lead_name.clone());
    customizations.insert("industry".to_owned(), args.industry.clone());
    for (key, value) in parse_set_pairs(&args.set)? {
        customizations.insert(key, value);
    }

    let publisher = config::profile_to_publisher(&profile);
    let deployer = Deployer::new(deploy_config, publisher);
    let deployment = deployer.deploy(&args.lead_name, &template_html, customizations)?;

    let format = config::resolve_output(global, &cfg);
    let color = output::should_color(&config::resolve_color(global, &cfg));
    let out = output::render_single(
        &format,
        &deployment,
        |d| format_receipt(d, color),
        |d| d.url.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
