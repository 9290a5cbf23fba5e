use std::io;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::publish::PublishError;

/// Errors from the deployment engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Site directory could not be created under the sites root.
    #[error("failed to create site directory {}", path.display())]
    CreateSiteDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Rendered page or record could not be written.
    #[error("failed to write {}", path.display())]
    WriteSite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Deployment record could not be read.
    #[error("failed to read deployment record {}", path.display())]
    ReadRecord {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Deployment record exists but does not parse.
    #[error("malformed deployment record {}", path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Deployment record could not be serialized.
    #[error("failed to encode deployment record")]
    EncodeRecord(#[source] serde_json::Error),

    /// Sites root exists but could not be listed.
    #[error("failed to scan sites root {}", path.display())]
    ScanSites {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Base URL cannot take a site identifier as a path segment.
    #[error("cannot derive a site URL from base {base}")]
    SiteUrl {
        base: Url,
        #[source]
        source: url::ParseError,
    },

    /// Publishing failed under the strict policy.
    #[error(transparent)]
    Publish(#[from] PublishError),
}
