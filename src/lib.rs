pub mod config;
pub mod error;
pub mod exec;
pub mod locks;
pub mod logging;
pub mod ops;
pub mod remote;

mod app;
pub mod commands;

#[cfg(test)]
mod test_support;

pub use app::App;
pub use config::Config;
pub use error::OpsError;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
