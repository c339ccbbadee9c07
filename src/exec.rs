#![allow(async_fn_in_trait)]

use std::fmt::Display;
use std::path;
use std::process::Stdio;

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::watch;

// -----------------------------------------------------------------------------
// Types

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: path::PathBuf,
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Error)]
pub enum CommandError {
    #[error("failed to execute `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("`{command}` exited with {}: {}", exit_code_label(.code), .output.trim())]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("`{command}` was cancelled")]
    Cancelled { command: String },
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Fires once the paired [`CancelHandle`] is cancelled.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Runs external programs.
#[cfg_attr(test, automock)]
pub trait Executor {
    async fn run(
        &self,
        invocation: &Invocation,
        cancel: &CancelToken,
    ) -> Result<CommandOutput, CommandError>;
}

// -----------------------------------------------------------------------------
// Invocation impl

impl Invocation {
    pub fn git<I, S>(cwd: &path::Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: "git".to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
        }
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// CommandOutput impl

impl CommandOutput {
    #[cfg(test)]
    pub(crate) fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined
    }
}

impl CommandError {
    /// The combined output of the failed command, if it got far enough to produce any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } => Some(output),
            Self::Spawn { .. } | Self::Cancelled { .. } => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Cancellation

/// Create a connected cancel handle and token.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_, token) = cancel_pair();
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped uncancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

// -----------------------------------------------------------------------------
// RealExecutor

/// Real implementation that spawns subprocesses.
#[derive(Debug, Default)]
pub struct RealExecutor {
    envs: Vec<(String, String)>,
}

impl RealExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an extra environment variable on every spawned process.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl Executor for RealExecutor {
    async fn run(
        &self,
        invocation: &Invocation,
        cancel: &CancelToken,
    ) -> Result<CommandOutput, CommandError> {
        let command_line = invocation.to_string();
        if cancel.is_cancelled() {
            return Err(CommandError::Cancelled {
                command: command_line,
            });
        }

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // Dropping the output future on cancellation kills the child.
        let output = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(CommandError::Cancelled { command: command_line });
            }
            output = command.output() => output.map_err(|e| CommandError::Spawn {
                command: command_line.clone(),
                message: e.to_string(),
            })?,
        };

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(CommandError::Failed {
                command: command_line,
                code: output.status.code(),
                output: captured.combined(),
            });
        }

        Ok(captured)
    }
}
