//! Programmatic configuration builder for integration tests

use std::net::{IpAddr, Ipv4Addr};

use stress_config::{Config, PRODUCTION};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with loopback defaults
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.server.port = 0;
        config.log.request_log = false;

        Self { config }
    }

    /// Redact internal diagnostics from 500 responses
    pub fn production(mut self) -> Self {
        self.config.environment = Some(PRODUCTION.to_owned());
        self
    }

    /// Set the blocking worker default and ceiling
    pub fn with_blocking_workers(mut self, default: u64, max: u64) -> Self {
        self.config.limits.default_blocking_workers = default;
        self.config.limits.max_blocking_workers = max;
        self
    }

    /// Set the event log capacity
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.config.events.capacity = capacity;
        self
    }

    /// Set the memory ceiling
    pub fn with_max_memory_mb(mut self, max: u64) -> Self {
        self.config.limits.max_memory_allocation_mb = max;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
