use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::ensure;

#[derive(Debug, Clone)]
pub struct Config {
    /// Repository working directory (canonical).
    pub working_dir: PathBuf,
    pub debug: bool,
    /// GitHub account used for the remote URL.
    pub account: Option<String>,
    /// Committer name; falls back to the account.
    pub committer_name: Option<String>,
}

impl Config {
    /// Create a config, resolving the working directory to a canonical path.
    pub fn load(
        dir: &Path,
        debug: bool,
        account: Option<String>,
        committer_name: Option<String>,
    ) -> Result<Self> {
        let working_dir = std::fs::canonicalize(dir)
            .with_context(|| format!("Cannot access working directory {}", dir.display()))?;
        ensure!(
            working_dir.is_dir(),
            "Working directory {} is not a directory",
            working_dir.display()
        );

        Ok(Self::new(working_dir, debug, account, committer_name))
    }

    /// Create a new config with explicit values (useful for tests)
    pub fn new(
        working_dir: PathBuf,
        debug: bool,
        account: Option<String>,
        committer_name: Option<String>,
    ) -> Self {
        Self {
            working_dir,
            debug,
            account: account.filter(|a| !a.is_empty()),
            committer_name: committer_name.filter(|n| !n.is_empty()),
        }
    }

    /// Default config for tests
    pub fn default_for_tests(working_dir: PathBuf) -> Self {
        Self::new(working_dir, true, Some("tester".to_string()), None)
    }

    pub fn committer_name(&self) -> Option<&str> {
        self.committer_name.as_deref().or(self.account.as_deref())
    }

    /// Default repository name: the working directory's base name.
    pub fn default_repo_name(&self) -> Option<String> {
        self.working_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}
