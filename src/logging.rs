//! Progress logging.
//!
//! Progress markers go to stderr through `tracing` so stdout only carries the
//! diff and the final summary. `RUST_LOG` overrides the level chosen by the
//! debug flag.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Layer as _;

pub fn default_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

pub fn init(debug: bool) -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format()
        .with_timer(timer)
        .with_target(debug);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level(debug).into())
        .from_env()?;
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .event_format(format)
        .with_filter(filter);
    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(())
}
