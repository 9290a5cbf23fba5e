// ── Git publishing ──
//
// Publishing shells out to plain `git`: stage the site directory,
// commit, push. All three steps always run, mirroring a fire-and-forget
// pipeline; the first failure is reported once the sequence finishes.

use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

// ── Errors ──────────────────────────────────────────────────────────

/// Failure from a publishing backend.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The subprocess could not be launched at all, e.g. no `git` on
    /// the PATH.
    #[error("failed to launch `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The subprocess ran and exited unsuccessfully.
    #[error("`{command}` failed ({status})")]
    CommandFailed { command: String, status: ExitStatus },
}

// ── Policy ──────────────────────────────────────────────────────────

/// How a deployment treats publish failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishPolicy {
    /// Run the publish steps, but keep the deployment and record the
    /// failure in the receipt when git misbehaves.
    #[default]
    BestEffort,
    /// Fail the deployment on any publish error.
    Strict,
    /// Skip publishing entirely.
    Disabled,
}

impl PublishPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BestEffort => "best-effort",
            Self::Strict => "strict",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for PublishPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Publisher ───────────────────────────────────────────────────────

/// Publishing backend for deployed sites.
pub trait Publisher {
    /// Stage `site_dir`, commit with `message`, and push.
    fn publish(&self, site_dir: &Path, message: &str) -> Result<(), PublishError>;
}

/// [`Publisher`] backed by the system `git` binary, run in the current
/// working directory.
///
/// Remote and branch are optional push targets; when unset, `git push`
/// falls back to the repository's upstream configuration. A branch
/// without a remote is dropped with a warning, since `git push
/// <branch>` alone would misread the branch as a remote name.
#[derive(Debug, Clone, Default)]
pub struct GitPublisher {
    remote: Option<String>,
    branch: Option<String>,
}

impl GitPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publisher pushing to an explicit remote and optionally a branch.
    pub fn with_target(remote: Option<String>, branch: Option<String>) -> Self {
        Self { remote, branch }
    }

    /// Arguments for the push step, per the configured target.
    fn push_args(&self) -> Vec<&str> {
        let mut args = vec!["push"];
        if let Some(remote) = &self.remote {
            args.push(remote);
            if let Some(branch) = &self.branch {
                args.push(branch);
            }
        } else if self.branch.is_some() {
            warn!("push branch configured without a remote; using the upstream instead");
        }
        args
    }

    fn run(mut command: Command) -> Result<(), PublishError> {
        let rendered = render_git(&command);
        debug!(command = %rendered, "running publish step");
        let status = command.status().map_err(|source| PublishError::Spawn {
            command: rendered.clone(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(PublishError::CommandFailed {
                command: rendered,
                status,
            })
        }
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, site_dir: &Path, message: &str) -> Result<(), PublishError> {
        let mut first_failure = None;

        let mut stage = Command::new("git");
        stage.arg("add").arg(site_dir);
        record(&mut first_failure, Self::run(stage));

        let mut commit = Command::new("git");
        commit.args(["commit", "-m", message]);
        record(&mut first_failure, Self::run(commit));

        let mut push = Command::new("git");
        push.args(self.push_args());
        record(&mut first_failure, Self::run(push));

        first_failure.map_or(Ok(()), Err)
    }
}

// Keep the first failure; later ones are logged and dropped.
fn record(first_failure: &mut Option<PublishError>, result: Result<(), PublishError>) {
    if let Err(err) = result {
        if first_failure.is_none() {
            *first_failure = Some(err);
        } else {
            debug!(error = %err, "subsequent publish step also failed");
        }
    }
}

fn render_git(command: &Command) -> String {
    let args: Vec<_> = command
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    format!("git {}", args.join(" "))
}
