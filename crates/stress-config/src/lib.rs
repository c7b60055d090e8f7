#![allow(clippy::must_use_candidate)]

mod env;
pub mod events;
pub mod health;
pub mod limits;
mod loader;
pub mod log;
pub mod metrics;
pub mod server;

use serde::Deserialize;

pub use events::*;
pub use health::*;
pub use limits::*;
pub use log::*;
pub use metrics::*;
pub use server::*;

/// Value of `environment` that switches on production error redaction
pub const PRODUCTION: &str = "production";

/// Top-level stress-lab configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener and probe endpoint
    #[serde(default)]
    pub server: ServerConfig,
    /// Upper bounds applied by the request validators
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Simulation event ring buffer
    #[serde(default)]
    pub events: EventsConfig,
    /// Settings published to dashboard clients
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Log output
    #[serde(default)]
    pub log: LogConfig,
    /// Deployment environment name (`APP_ENV`)
    #[serde(default)]
    pub environment: Option<String>,
}

impl Config {
    /// Whether error responses must hide internal diagnostics
    pub fn is_production(&self) -> bool {
        self.environment.as_deref() == Some(PRODUCTION)
    }

    /// Snapshot of the validation bounds derived from the limits
    pub const fn bounds(&self) -> ValidationBounds {
        ValidationBounds::from_limits(&self.limits)
    }
}
