//! Deployment engine for demoforge: derive a site identifier from a
//! lead name, render a personalized page, persist the page plus a
//! deployment record, and publish the result through git.
//!
//! - **[`SiteId`]** — sanitized `demo-…` identifier, serving as both
//!   the directory name under the sites root and the URL path segment.
//! - **[`render`]** — literal `{{key}}` substitution with no template
//!   language semantics.
//! - **[`SiteMetadata`]** — the `deployed.json` record written next to
//!   each page.
//! - **[`Deployer`]** — runs one deployment end to end against a
//!   [`DeployConfig`].
//! - **[`Publisher`] / [`GitPublisher`]** — the publishing seam and the
//!   subprocess-git implementation behind it, governed by
//!   [`PublishPolicy`].
//!
//! The crate does no terminal or configuration-file I/O; callers hand
//! it template text and settings and receive a [`Deployment`] receipt.

pub mod deploy;
pub mod error;
pub mod publish;
pub mod site;
pub mod template;

// ── Primary re-exports ──────────────────────────────────────────────
pub use deploy::{
    DEFAULT_BASE_URL, DEFAULT_SITES_ROOT, DeployConfig, Deployer, Deployment, PublishOutcome,
    site_url,
};
pub use error::CoreError;
pub use publish::{GitPublisher, PublishError, PublishPolicy, Publisher};
pub use site::{METADATA_FILE, PAGE_FILE, SiteId, SiteMetadata, sanitize, scan_sites};
pub use template::render;
