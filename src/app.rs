use anyhow::Context;
use anyhow::Result;

use crate::config::Config;
use crate::exec::Executor;
use crate::ops::Operations;

pub struct App<E> {
    pub config: Config,
    pub ops: Operations<E>,
}

impl<E: Executor> App<E> {
    pub fn new(config: Config, executor: E) -> Self {
        let ops = Operations::new(executor, &config);
        Self { config, ops }
    }
}

/// Shared helper methods for App
impl<E: Executor> App<E> {
    /// The repository name to use, defaulting to the working directory's name.
    pub(crate) fn repo_name(&self, requested: Option<&str>) -> Result<String> {
        match requested {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => self.config.default_repo_name().with_context(|| {
                format!(
                    "Cannot derive a repository name from {}; pass --repo",
                    self.config.working_dir.display()
                )
            }),
        }
    }
}
