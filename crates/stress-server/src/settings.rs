use axum::Json;
use axum::extract::State;
use serde::Serialize;
use stress_config::Config;

use crate::state::AppState;

/// Configuration the dashboard needs to pace itself and pre-validate forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    pub metrics_poll_interval_ms: u64,
    pub event_log_capacity: usize,
    pub limits: PublicLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLimits {
    pub min_duration_seconds: u64,
    pub max_duration_seconds: u64,
    pub min_memory_mb: u64,
    pub max_memory_mb: u64,
    pub min_cpu_load_percent: u64,
    pub max_cpu_load_percent: u64,
    pub default_blocking_workers: u64,
    pub max_blocking_workers: u64,
}

impl PublicSettings {
    pub fn from_config(config: &Config) -> Self {
        let bounds = config.bounds();

        Self {
            metrics_poll_interval_ms: config.metrics.poll_interval_ms,
            event_log_capacity: config.events.capacity,
            limits: PublicLimits {
                min_duration_seconds: bounds.min_duration_seconds,
                max_duration_seconds: bounds.max_duration_seconds,
                min_memory_mb: bounds.min_memory_mb,
                max_memory_mb: bounds.max_memory_mb,
                min_cpu_load_percent: bounds.min_cpu_load_percent,
                max_cpu_load_percent: bounds.max_cpu_load_percent,
                default_blocking_workers: bounds.default_blocking_workers,
                max_blocking_workers: bounds.max_blocking_workers,
            },
        }
    }
}

pub async fn settings_handler(State(state): State<AppState>) -> Json<PublicSettings> {
    Json(PublicSettings::clone(&state.settings))
}
