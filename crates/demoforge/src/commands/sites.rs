//! Sites command handlers.

use chrono::{DateTime, SecondsFormat, Utc};
use tabled::Tabled;

use demoforge_core::{CoreError, METADATA_FILE, SiteId, SiteMetadata, scan_sites, site_url};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Lead")]
    lead: String,
    #[tabled(rename = "Deployed")]
    deployed: String,
}

impl From<&SiteMetadata> for SiteRow {
    fn from(metadata: &SiteMetadata) -> Self {
        Self {
            site: metadata.subdomain.to_string(),
            lead: metadata.lead.clone(),
            deployed: format_timestamp(&metadata.deployed),
        }
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Multi-line detail view for table output.
fn format_site_detail(metadata: &SiteMetadata, url: &url::Url) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(out, "Site:     {}", metadata.subdomain);
    let _ = writeln!(out, "Lead:     {}", metadata.lead);
    let _ = writeln!(out, "Deployed: {}", format_timestamp(&metadata.deployed));
    let _ = write!(out, "URL:      {url}");
    if metadata.customizations.is_empty() {
        let _ = write!(out, "\nCustomizations: (none)");
    } else {
        let _ = write!(out, "\nCustomizations:");
        for (key, value) in &metadata.customizations {
            let _ = write!(out, "\n  {key} = {value}");
        }
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: SitesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let (_, profile) = config::active_profile(global, &cfg)?;
    let deploy_config = config::resolve_deploy_config(&profile, global)?;
    let format = config::resolve_output(global, &cfg);

    match args.command {
        SitesCommand::List => {
            let sites = scan_sites(&deploy_config.sites_root)?;
            let out = output::render_list(
                &format,
                &sites,
                |m| SiteRow::from(m),
                |m| m.subdomain.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Show { site } => {
            let site_id = SiteId::resolve(&site);
            let record_path = deploy_config.site_dir(&site_id).join(METADATA_FILE);
            let metadata = SiteMetadata::load(&record_path).map_err(|err| match err {
                CoreError::ReadRecord { ref source, .. }
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    CliError::SiteNotFound {
                        identifier: site.clone(),
                    }
                }
                other => CliError::from(other),
            })?;

            let url = site_url(&deploy_config.base_url, &metadata.subdomain)?;
            let out = output::render_single(
                &format,
                &metadata,
                |m| format_site_detail(m, &url),
                |m| m.subdomain.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
