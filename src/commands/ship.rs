use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::commands::diff::write_diff;
use crate::error::OpsError;
use crate::exec::CancelToken;
use crate::exec::Executor;

/// Arguments of a full commit-and-push run.
#[derive(Debug, Clone, Default)]
pub struct ShipRequest {
    pub message: String,
    /// Repository name for a newly added remote.
    pub repo: Option<String>,
    /// Empty means `origin`.
    pub remote: String,
    /// Empty means `main`.
    pub branch: String,
    /// Stop after showing the diff.
    pub dry_run: bool,
}

impl<E: Executor> App<E> {
    /// Run the whole workflow.
    ///
    /// 1. Initialize the repository, configure the committer and the `origin` remote.
    /// 2. Show pending changes.
    /// 3. Stage everything. Fails with [`OpsError::NoChanges`] if nothing is staged.
    /// 4. Commit with the given message.
    /// 5. Push and set upstream tracking.
    ///
    /// The first failure stops the run; earlier steps are not undone.
    pub async fn cmd_ship(
        &self,
        request: &ShipRequest,
        cancel: &CancelToken,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        // Checked up front so a bad message doesn't leave a half-set-up repository
        if request.message.trim().is_empty() {
            return Err(OpsError::EmptyMessage.into());
        }
        let repo_name = self.repo_name(request.repo.as_deref())?;

        self.ops.ensure_setup(&repo_name, cancel).await?;

        let diff = self.ops.get_changes(cancel).await?;
        write_diff(stdout, &diff)?;

        if request.dry_run {
            writeln!(stdout, "Dry run: nothing staged, committed or pushed")?;
            return Ok(());
        }

        self.ops.stage_all(cancel).await?;
        self.ops.commit(&request.message, cancel).await?;
        let target = self
            .ops
            .push(&request.remote, &request.branch, cancel)
            .await?;

        writeln!(stdout, "{} {}", "Pushed to".green().bold(), target)?;
        Ok(())
    }
}
