use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::exec::CancelToken;
use crate::exec::Executor;

impl<E: Executor> App<E> {
    pub async fn cmd_diff(
        &self,
        cancel: &CancelToken,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let diff = self.ops.get_changes(cancel).await?;
        if diff.is_empty() {
            writeln!(stdout, "No changes")?;
        } else {
            write_diff(stdout, &diff)?;
        }
        Ok(())
    }
}

/// Write a unified diff, coloured by line kind.
pub fn write_diff(stdout: &mut impl std::io::Write, diff: &str) -> Result<()> {
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") || line.starts_with("diff ") {
            writeln!(stdout, "{}", line.bold())?;
        } else if line.starts_with('+') {
            writeln!(stdout, "{}", line.green())?;
        } else if line.starts_with('-') {
            writeln!(stdout, "{}", line.red())?;
        } else if line.starts_with("@@") {
            writeln!(stdout, "{}", line.cyan())?;
        } else {
            writeln!(stdout, "{line}")?;
        }
    }
    Ok(())
}
