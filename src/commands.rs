//! One module per CLI subcommand, each adding a `cmd_*` method to [`App`](crate::App).
//!
//! - [`ship`]: the full workflow (setup, diff, stage, commit, push)
//! - [`setup`]: repository initialization and remote configuration only
//! - [`diff`]: show pending changes

pub mod diff;
pub mod setup;
pub mod ship;
