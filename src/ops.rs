//! Repository operations.
//!
//! [`Operations`] sequences git invocations for the quick commit-and-push
//! workflow. Each operation maps command failures onto one [`OpsError`] variant;
//! the only retries are the two fallbacks in [`Operations::get_changes`] and
//! [`Operations::stage_all`]. Nothing is rolled back on failure.

use std::io::ErrorKind;
use std::path;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::config::Config;
use crate::error::OpsError;
use crate::exec::CancelToken;
use crate::exec::CommandError;
use crate::exec::CommandOutput;
use crate::exec::Executor;
use crate::exec::Invocation;
use crate::locks;
use crate::remote;
use crate::remote::PushTarget;

// -----------------------------------------------------------------------------
// Types

pub struct Operations<E> {
    executor: E,
    working_dir: path::PathBuf,
    account: Option<String>,
    committer_name: Option<String>,
}

/// What [`Operations::ensure_setup`] had to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOutcome {
    pub initialized: bool,
    /// URL of the `origin` remote, if it was added.
    pub remote_added: Option<String>,
}

// -----------------------------------------------------------------------------
// Operations impl

impl<E: Executor> Operations<E> {
    pub fn new(executor: E, config: &Config) -> Self {
        Self {
            executor,
            working_dir: config.working_dir.clone(),
            account: config.account.clone(),
            committer_name: config.committer_name().map(str::to_string),
        }
    }

    /// Initialize the repository if needed, configure the committer identity
    /// and add an `origin` remote if there is none.
    #[instrument(skip_all, fields(repo = repo_name))]
    pub async fn ensure_setup(
        &self,
        repo_name: &str,
        cancel: &CancelToken,
    ) -> Result<SetupOutcome, OpsError> {
        let git_dir = self.working_dir.join(".git");
        let initialized = match tokio::fs::metadata(&git_dir).await {
            Ok(_) => {
                info!("Git repository already initialized");
                false
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Initializing git repository...");
                self.clear_locks().await?;
                self.git(["init"], cancel).await.map_err(|source| {
                    error!("Failed to initialize git repository");
                    OpsError::Setup {
                        step: "initialize git repository",
                        source,
                    }
                })?;
                info!("Git repository initialized");
                true
            }
            Err(source) => {
                return Err(OpsError::Inspect {
                    path: git_dir,
                    source,
                });
            }
        };

        self.configure_identity(cancel).await?;

        info!("Checking remote configuration...");
        let remote_added = match self.git(["remote", "get-url", "origin"], cancel).await {
            Ok(output) => {
                info!("Remote origin already configured");
                debug!(url = output.stdout.trim(), "existing remote");
                None
            }
            Err(CommandError::Failed { .. }) => {
                let account = self.account.as_deref().ok_or(OpsError::MissingAccount)?;
                let url = remote::github_url(account, repo_name)?;
                info!("Adding remote origin: {url}");
                self.clear_locks().await?;
                self.git(["remote", "add", "origin", url.as_str()], cancel)
                    .await
                    .map_err(|source| {
                        error!("Failed to add remote origin");
                        OpsError::Setup {
                            step: "add remote origin",
                            source,
                        }
                    })?;
                info!("Remote origin added");
                Some(url)
            }
            Err(source) => {
                error!("Failed to check remote configuration");
                return Err(OpsError::Setup {
                    step: "check remote origin",
                    source,
                });
            }
        };

        Ok(SetupOutcome {
            initialized,
            remote_added,
        })
    }

    async fn configure_identity(&self, cancel: &CancelToken) -> Result<(), OpsError> {
        let name = self
            .committer_name
            .as_deref()
            .ok_or(OpsError::MissingAccount)?;
        info!("Configuring git user...");
        self.git(["config", "--global", "user.name", name], cancel)
            .await
            .map_err(|source| {
                error!("Failed to set git username");
                OpsError::Setup {
                    step: "set git user.name",
                    source,
                }
            })?;
        info!("Git user configured");
        Ok(())
    }

    /// Diff of staged changes, or of unstaged changes when nothing is staged.
    ///
    /// An empty string means there are no changes at all.
    #[instrument(skip_all)]
    pub async fn get_changes(&self, cancel: &CancelToken) -> Result<String, OpsError> {
        info!("Getting changes...");
        let staged = match self.git(["diff", "--cached"], cancel).await {
            Ok(output) => output.stdout,
            Err(e) => {
                debug!(error = %e, "Staged diff failed");
                String::new()
            }
        };

        let diff = if staged.is_empty() {
            debug!("No staged changes, checking unstaged changes...");
            self.git(["diff"], cancel)
                .await
                .map_err(|source| {
                    error!("Failed to get changes");
                    OpsError::Diff(source)
                })?
                .stdout
        } else {
            staged
        };

        if diff.is_empty() {
            warn!("No changes detected");
        } else {
            info!("Changes detected");
        }
        Ok(diff)
    }

    /// Stage everything and return the resulting porcelain status.
    #[instrument(skip_all)]
    pub async fn stage_all(&self, cancel: &CancelToken) -> Result<String, OpsError> {
        info!("Staging all changes...");

        self.clear_locks().await?;
        if let Err(e) = self.git(["add", "-A"], cancel).await {
            if matches!(e, CommandError::Cancelled { .. }) {
                return Err(OpsError::Stage(e));
            }
            warn!("Failed to stage with -A flag, trying alternative method...");
            let dir = self.working_dir.to_string_lossy().into_owned();
            self.clear_locks().await?;
            self.git(["add", dir.as_str()], cancel)
                .await
                .map_err(|source| {
                    error!("Failed to stage changes");
                    OpsError::Stage(source)
                })?;
        }

        let status = self
            .git(["status", "--porcelain"], cancel)
            .await
            .map_err(|source| {
                error!("Failed to check git status");
                OpsError::Stage(source)
            })?
            .stdout;

        if status.trim().is_empty() {
            warn!("No changes to stage");
            return Err(OpsError::NoChanges);
        }

        info!("Changes staged");
        debug!("Staged files:\n{status}");
        Ok(status)
    }

    #[instrument(skip_all)]
    pub async fn commit(&self, message: &str, cancel: &CancelToken) -> Result<(), OpsError> {
        if message.trim().is_empty() {
            return Err(OpsError::EmptyMessage);
        }

        info!("Committing changes...");
        self.clear_locks().await?;
        self.git(["commit", "-m", message], cancel)
            .await
            .map_err(|source| {
                error!("Failed to commit changes");
                OpsError::Commit(source)
            })?;
        info!("Changes committed");
        Ok(())
    }

    /// Push to `remote`/`branch` and set upstream tracking. Empty names default
    /// to `origin` and `main`.
    #[instrument(skip_all)]
    pub async fn push(
        &self,
        remote: &str,
        branch: &str,
        cancel: &CancelToken,
    ) -> Result<PushTarget, OpsError> {
        let target = PushTarget::resolve(remote, branch);

        info!("Pushing to {target}...");
        self.clear_locks().await?;
        if let Err(source) = self
            .git(
                ["push", "-u", target.remote.as_str(), target.branch.as_str()],
                cancel,
            )
            .await
        {
            error!("Failed to push changes");
            return Err(OpsError::Push {
                remote: target.remote,
                branch: target.branch,
                source,
            });
        }
        info!("Changes pushed successfully");
        Ok(target)
    }

    /// Run a git command in the working directory, logging its command line and
    /// failure output.
    async fn git<const N: usize>(
        &self,
        args: [&str; N],
        cancel: &CancelToken,
    ) -> Result<CommandOutput, CommandError> {
        let invocation = Invocation::git(&self.working_dir, args);
        debug!(command = %invocation, "Running");
        self.executor
            .run(&invocation, cancel)
            .await
            .inspect_err(|e| {
                if let Some(output) = e.output() {
                    debug!("Command output: {output}");
                }
            })
    }

    /// Remove stale locks; called before every repository-mutating command.
    async fn clear_locks(&self) -> Result<(), OpsError> {
        locks::remove_stale_locks(&self.working_dir).await?;
        Ok(())
    }
}
