use std::str::FromStr;

use anyhow::Context;

use crate::Config;

/// Overlay the documented environment variables onto a configuration
///
/// Unset or empty variables leave the current value alone. A set but
/// unparsable value is an error rather than a silent fallback.
pub fn apply_overrides(config: &mut Config) -> anyhow::Result<()> {
    if let Some(port) = parse_var("PORT")? {
        config.server.port = port;
    }
    if let Some(interval) = parse_var("METRICS_POLL_INTERVAL_MS")? {
        config.metrics.poll_interval_ms = interval;
    }
    if let Some(seconds) = parse_var("MAX_SIMULATION_DURATION_SECONDS")? {
        config.limits.max_simulation_duration_seconds = seconds;
    }
    if let Some(mb) = parse_var("MAX_MEMORY_ALLOCATION_MB")? {
        config.limits.max_memory_allocation_mb = mb;
    }
    if let Some(workers) = parse_var("DEFAULT_BLOCKING_WORKERS")? {
        config.limits.default_blocking_workers = workers;
    }
    if let Some(workers) = parse_var("MAX_BLOCKING_WORKERS")? {
        config.limits.max_blocking_workers = workers;
    }
    if let Some(capacity) = parse_var("EVENT_LOG_CAPACITY")? {
        config.events.capacity = capacity;
    }
    if let Some(retained) = parse_var("MAX_RETAINED_SIMULATIONS")? {
        config.events.retained_simulations = retained;
    }
    if let Some(env) = read_var("APP_ENV") {
        config.environment = Some(env);
    }
    if let Some(level) = read_var("LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(json) = read_var("JSON_LOGS") {
        config.log.json = parse_flag("JSON_LOGS", &json)?;
    }

    Ok(())
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    read_var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .with_context(|| format!("invalid value for `{name}`: `{raw}`"))
        })
        .transpose()
}

fn parse_flag(name: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("invalid value for `{name}`: `{raw}`"),
    }
}
