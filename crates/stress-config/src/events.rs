use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsConfig {
    /// Number of simulation events retained in memory
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Finished simulations kept for lookup; the oldest are evicted first
    #[serde(default = "default_retained_simulations")]
    pub retained_simulations: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            retained_simulations: default_retained_simulations(),
        }
    }
}

const fn default_capacity() -> usize {
    100
}

const fn default_retained_simulations() -> usize {
    100
}
