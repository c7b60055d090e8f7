use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration, reading each setting once for the process
    ///
    /// Starts from the built-in defaults, layers the optional TOML file on
    /// top, then the environment variables, then validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an
    /// environment variable holds an unparsable value, or validation fails
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
                toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?
            }
            None => Self::default(),
        };

        crate::env::apply_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Load from environment variables and built-in fallbacks only
    ///
    /// # Errors
    ///
    /// See [`Config::load`]
    pub fn from_env() -> anyhow::Result<Self> {
        Self::load(None)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a limit falls below its fixed minimum or a
    /// capacity is zero
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_limits()?;

        if self.events.capacity == 0 {
            anyhow::bail!("events.capacity must be greater than 0");
        }

        if self.events.retained_simulations == 0 {
            anyhow::bail!("events.retained_simulations must be greater than 0");
        }

        if self.metrics.poll_interval_ms == 0 {
            anyhow::bail!("metrics.poll_interval_ms must be greater than 0");
        }

        if !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        Ok(())
    }

    fn validate_limits(&self) -> anyhow::Result<()> {
        let bounds = self.bounds();

        if bounds.max_duration_seconds < bounds.min_duration_seconds {
            anyhow::bail!(
                "limits.max_simulation_duration_seconds must be at least {}",
                bounds.min_duration_seconds
            );
        }

        if bounds.max_memory_mb < bounds.min_memory_mb {
            anyhow::bail!("limits.max_memory_allocation_mb must be at least {}", bounds.min_memory_mb);
        }

        if bounds.default_blocking_workers == 0 {
            anyhow::bail!("limits.default_blocking_workers must be greater than 0");
        }

        if bounds.max_blocking_workers < bounds.default_blocking_workers {
            anyhow::bail!(
                "limits.max_blocking_workers ({}) must be >= limits.default_blocking_workers ({})",
                bounds.max_blocking_workers,
                bounds.default_blocking_workers
            );
        }

        Ok(())
    }
}
