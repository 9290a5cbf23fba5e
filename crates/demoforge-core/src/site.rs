// ── Site identity and deployment records ──
//
// A SiteId is both the directory name under the sites root and the URL
// path segment of a deployed demo ("demo-acme-corp"). SiteMetadata is
// the deployed.json record written next to the page.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreError;

/// File name of the personalized page inside a site directory.
pub const PAGE_FILE: &str = "index.html";

/// File name of the deployment record inside a site directory.
pub const METADATA_FILE: &str = "deployed.json";

const SITE_PREFIX: &str = "demo-";

/// Sanitize a lead name into the slug portion of a site identifier.
///
/// ASCII letters are lowercased, each space and underscore becomes a
/// hyphen, and every remaining character outside `[a-z0-9-]` is
/// dropped. Total over arbitrary input and idempotent over its own
/// output; an all-punctuation name sanitizes to the empty string.
pub fn sanitize(lead_name: &str) -> String {
    let mut slug = String::with_capacity(lead_name.len());
    for ch in lead_name.chars() {
        match ch.to_ascii_lowercase() {
            ' ' | '_' => slug.push('-'),
            c if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' => slug.push(c),
            _ => {}
        }
    }
    slug
}

// ── SiteId ──────────────────────────────────────────────────────────

/// Sanitized site identifier: `demo-` followed by `[a-z0-9-]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

impl SiteId {
    /// Derive the identifier for a lead name.
    pub fn from_lead_name(lead_name: &str) -> Self {
        Self(format!("{SITE_PREFIX}{}", sanitize(lead_name)))
    }

    /// Interpret user input as either an existing identifier or a lead
    /// name to sanitize.
    ///
    /// Input that already has the identifier shape passes through
    /// unchanged, so `demo-acme-corp` does not become
    /// `demo-demo-acme-corp`.
    pub fn resolve(input: &str) -> Self {
        if Self::is_valid(input) {
            Self(input.to_owned())
        } else {
            Self::from_lead_name(input)
        }
    }

    /// Whether a string already is a well-formed site identifier.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.starts_with(SITE_PREFIX)
            && candidate
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The portion after the `demo-` prefix.
    pub fn slug(&self) -> &str {
        self.0.strip_prefix(SITE_PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SiteId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::resolve(s))
    }
}

// ── SiteMetadata ────────────────────────────────────────────────────

/// Deployment record persisted as `deployed.json` next to the page.
///
/// Field declaration order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    /// UTC instant the deployment was written.
    pub deployed: DateTime<Utc>,
    /// Site identifier, which is also the directory name.
    pub subdomain: SiteId,
    /// Lead name exactly as supplied by the caller.
    pub lead: String,
    /// Placeholder values the page was rendered with.
    pub customizations: BTreeMap<String, String>,
}

impl SiteMetadata {
    /// Stamp a fresh record for a deployment happening now.
    pub fn new(
        subdomain: SiteId,
        lead: impl Into<String>,
        customizations: BTreeMap<String, String>,
    ) -> Self {
        Self {
            deployed: Utc::now(),
            subdomain,
            lead: lead.into(),
            customizations,
        }
    }

    /// Read a record back from disk.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path).map_err(|source| CoreError::ReadRecord {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CoreError::MalformedRecord {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the record as pretty-printed JSON, replacing any previous
    /// deployment's record.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(self).map_err(CoreError::EncodeRecord)?;
        fs::write(path, json).map_err(|source| CoreError::WriteSite {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Collect deployment records under a sites root, sorted by identifier.
///
/// A missing root yields an empty listing. Subdirectories without a
/// record are ignored; unreadable records are skipped with a warning.
pub fn scan_sites(sites_root: &Path) -> Result<Vec<SiteMetadata>, CoreError> {
    if !sites_root.exists() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(sites_root).map_err(|source| CoreError::ScanSites {
        path: sites_root.to_path_buf(),
        source,
    })?;

    let mut sites = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CoreError::ScanSites {
            path: sites_root.to_path_buf(),
            source,
        })?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let record = dir.join(METADATA_FILE);
        if !record.exists() {
            continue;
        }
        match SiteMetadata::load(&record) {
            Ok(metadata) => sites.push(metadata),
            Err(err) => {
                warn!(path = %record.display(), error = %err, "skipping unreadable deployment record");
            }
        }
    }
    sites.sort_by(|a, b| a.subdomain.cmp(&b.subdomain));
    Ok(sites)
}
