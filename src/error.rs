use std::path::PathBuf;

use thiserror::Error;

use crate::exec::CommandError;

/// Failures of the repository operations.
///
/// Variants that come from a git invocation carry the [`CommandError`] as their
/// source, which in turn holds the captured output of the failed command.
#[derive(Debug, Error)]
pub enum OpsError {
    #[error("failed to {step}")]
    Setup {
        step: &'static str,
        #[source]
        source: CommandError,
    },

    #[error("no GitHub account configured; pass --account or set GITHUB_USERNAME")]
    MissingAccount,

    #[error("invalid {kind} {value:?} for remote URL")]
    InvalidRemoteName { kind: &'static str, value: String },

    #[error("failed to inspect {}", .path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to get diff")]
    Diff(#[source] CommandError),

    #[error("failed to stage changes")]
    Stage(#[source] CommandError),

    #[error("no changes to commit")]
    NoChanges,

    #[error("commit message must not be empty")]
    EmptyMessage,

    #[error("failed to commit")]
    Commit(#[source] CommandError),

    #[error("failed to push to {remote}/{branch}")]
    Push {
        remote: String,
        branch: String,
        #[source]
        source: CommandError,
    },

    #[error("failed to remove stale lock file {}", .path.display())]
    LockCleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OpsError {
    /// The underlying command failure, if this error came from a git invocation.
    pub fn command_error(&self) -> Option<&CommandError> {
        match self {
            Self::Setup { source, .. } | Self::Push { source, .. } => Some(source),
            Self::Diff(source) | Self::Stage(source) | Self::Commit(source) => Some(source),
            Self::MissingAccount
            | Self::InvalidRemoteName { .. }
            | Self::Inspect { .. }
            | Self::NoChanges
            | Self::EmptyMessage
            | Self::LockCleanup { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.command_error(), Some(CommandError::Cancelled { .. }))
    }
}
