use std::sync::Arc;

use stress_config::{Config, ValidationBounds};

use crate::registry::SimulationRegistry;
use crate::settings::PublicSettings;

/// Shared, read-mostly state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub bounds: ValidationBounds,
    pub registry: Arc<SimulationRegistry>,
    pub settings: Arc<PublicSettings>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bounds: config.bounds(),
            registry: Arc::new(SimulationRegistry::new(
                config.events.capacity,
                config.events.retained_simulations,
            )),
            settings: Arc::new(PublicSettings::from_config(config)),
        }
    }
}
