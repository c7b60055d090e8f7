//! Log output for stress-lab
//!
//! Installs the global `tracing` subscriber. Request lines and error lines
//! are ordinary `tracing` events, so this is the only place that decides
//! how they look on stdout.

use stress_config::LogConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging from configuration
///
/// Must be called once, before the server starts.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(false);
        registry.with(fmt_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false);
        registry.with(fmt_layer).try_init()
    };

    result.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
