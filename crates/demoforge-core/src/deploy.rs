// ── Deployment orchestration ──
//
// Deployer ties the pieces together: derive the identifier, create the
// site directory, render and write the page, write the record, then
// hand the directory to the publisher according to policy.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::CoreError;
use crate::publish::{PublishPolicy, Publisher};
use crate::site::{METADATA_FILE, PAGE_FILE, SiteId, SiteMetadata};
use crate::template::render;

/// Sites root used when nothing is configured.
pub const DEFAULT_SITES_ROOT: &str = "sites";

/// Base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "https://demos.example.com/";

// ── Configuration ───────────────────────────────────────────────────

/// Settings a [`Deployer`] operates under.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Directory holding one subdirectory per deployed site.
    pub sites_root: PathBuf,
    /// URL prefix the site identifier is appended to.
    pub base_url: Url,
    /// Publish failure handling.
    pub publish: PublishPolicy,
}

impl DeployConfig {
    /// Directory a given site deploys into.
    pub fn site_dir(&self, site_id: &SiteId) -> PathBuf {
        self.sites_root.join(site_id.as_str())
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            sites_root: PathBuf::from(DEFAULT_SITES_ROOT),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"),
            publish: PublishPolicy::default(),
        }
    }
}

/// Public URL for a site identifier under a base URL.
///
/// A base without a trailing slash gets one, so the identifier is
/// always appended as a new path segment instead of replacing the last
/// one.
pub fn site_url(base_url: &Url, site_id: &SiteId) -> Result<Url, CoreError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(site_id.as_str()).map_err(|source| CoreError::SiteUrl {
        base: base_url.clone(),
        source,
    })
}

// ── Receipt ─────────────────────────────────────────────────────────

/// How the publish step of a deployment ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum PublishOutcome {
    /// All publish steps ran cleanly.
    Published,
    /// Publishing was disabled for this deployment.
    Skipped,
    /// A publish step failed under the best-effort policy; the
    /// deployment itself stands.
    Failed { reason: String },
}

impl PublishOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Published => f.write_str("published"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Receipt for one completed deployment.
#[derive(Debug, Clone, Serialize)]
pub struct Deployment {
    /// Derived site identifier.
    pub site_id: SiteId,
    /// Directory the page and record were written into.
    pub site_dir: PathBuf,
    /// Public URL of the deployed site.
    pub url: Url,
    /// How publishing went.
    pub publish: PublishOutcome,
    /// The record written as `deployed.json`.
    pub metadata: SiteMetadata,
}

// ── Deployer ────────────────────────────────────────────────────────

/// Orchestrates deployments against one sites root.
#[derive(Debug)]
pub struct Deployer<P> {
    config: DeployConfig,
    publisher: P,
}

impl<P: Publisher> Deployer<P> {
    pub fn new(config: DeployConfig, publisher: P) -> Self {
        Self { config, publisher }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Deploy a personalized site for `lead_name`.
    ///
    /// Writes `index.html` and `deployed.json` under the site
    /// directory, creating it as needed and overwriting any previous
    /// deployment of the same lead, then publishes per the configured
    /// policy. Publish failures under the best-effort policy surface in
    /// the receipt, not as errors.
    pub fn deploy(
        &self,
        lead_name: &str,
        template_html: &str,
        customizations: BTreeMap<String, String>,
    ) -> Result<Deployment, CoreError> {
        let site_id = SiteId::from_lead_name(lead_name);
        if site_id.slug().is_empty() {
            warn!(lead = lead_name, "lead name sanitized to an empty slug");
        }

        let site_dir = self.config.site_dir(&site_id);
        fs::create_dir_all(&site_dir).map_err(|source| CoreError::CreateSiteDir {
            path: site_dir.clone(),
            source,
        })?;

        let page = render(template_html, &customizations);
        let page_path = site_dir.join(PAGE_FILE);
        fs::write(&page_path, &page).map_err(|source| CoreError::WriteSite {
            path: page_path,
            source,
        })?;

        let metadata = SiteMetadata::new(site_id.clone(), lead_name, customizations);
        metadata.save(&site_dir.join(METADATA_FILE))?;
        debug!(site = %site_id, dir = %site_dir.display(), "site files written");

        let publish = self.publish_site(&site_dir, lead_name)?;
        let url = site_url(&self.config.base_url, &site_id)?;
        info!(site = %site_id, %url, "deployed");

        Ok(Deployment {
            site_id,
            site_dir,
            url,
            publish,
            metadata,
        })
    }

    fn publish_site(&self, site_dir: &Path, lead_name: &str) -> Result<PublishOutcome, CoreError> {
        let message = format!("Deploy demo for {lead_name}");
        match self.config.publish {
            PublishPolicy::Disabled => {
                debug!("publishing disabled");
                Ok(PublishOutcome::Skipped)
            }
            PublishPolicy::Strict => {
                self.publisher.publish(site_dir, &message)?;
                Ok(PublishOutcome::Published)
            }
            PublishPolicy::BestEffort => match self.publisher.publish(site_dir, &message) {
                Ok(()) => Ok(PublishOutcome::Published),
                Err(err) => {
                    warn!(error = %err, "publish failed; deployment kept");
                    Ok(PublishOutcome::Failed {
                        reason: err.to_string(),
                    })
                }
            },
        }
    }
}
