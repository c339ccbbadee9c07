use anyhow::Result;

use crate::App;
use crate::exec::CancelToken;
use crate::exec::Executor;

impl<E: Executor> App<E> {
    pub async fn cmd_setup(
        &self,
        repo: Option<&str>,
        cancel: &CancelToken,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let repo_name = self.repo_name(repo)?;
        let outcome = self.ops.ensure_setup(&repo_name, cancel).await?;

        if outcome.initialized {
            writeln!(
                stdout,
                "Initialized repository in {}",
                self.config.working_dir.display()
            )?;
        }
        match outcome.remote_added {
            Some(url) => writeln!(stdout, "Added remote origin: {url}")?,
            None => writeln!(stdout, "Remote origin already configured")?,
        }
        Ok(())
    }
}
