use serde::Serialize;
use serde_json::{Map, Value};
use stress_config::ValidationBounds;
use stress_core::AppError;
use strum::{AsRefStr, Display, EnumString};

use crate::numeric::{Coerced, coerce, validate_bounded};

/// Validated input for a CPU stress simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStressParams {
    pub target_load_percent: u64,
    pub duration_seconds: u64,
}

/// Validated input for a memory pressure simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPressureParams {
    pub size_mb: u64,
}

/// Validated input for a request-blocking simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingParams {
    pub duration_seconds: u64,
    pub concurrent_workers: u64,
}

/// How a slow request spends its delay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, EnumString, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BlockingPattern {
    #[default]
    Sleep,
    CpuIntensive,
    FileIo,
}

/// Validated input for a slow-request simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowRequestParams {
    pub delay_seconds: u64,
    pub blocking_pattern: BlockingPattern,
}

fn as_object<'a>(data: &'a Value, what: &str) -> Result<&'a Map<String, Value>, AppError> {
    data.as_object()
        .ok_or_else(|| AppError::validation(format!("Invalid {what} parameters")))
}

/// Validate `{targetLoadPercent, durationSeconds}`
///
/// # Errors
///
/// Fails when `data` is not an object or either field is missing,
/// non-numeric or out of bounds.
pub fn validate_cpu_stress_params(data: &Value, bounds: &ValidationBounds) -> Result<CpuStressParams, AppError> {
    let data = as_object(data, "CPU stress")?;

    let target_load_percent = validate_bounded(
        data.get("targetLoadPercent"),
        "targetLoadPercent",
        bounds.min_cpu_load_percent,
        bounds.max_cpu_load_percent,
    )?;
    let duration_seconds = validate_bounded(
        data.get("durationSeconds"),
        "durationSeconds",
        bounds.min_duration_seconds,
        bounds.max_duration_seconds,
    )?;

    Ok(CpuStressParams {
        target_load_percent,
        duration_seconds,
    })
}

/// Validate `{sizeMb}`
///
/// # Errors
///
/// Fails when `data` is not an object or `sizeMb` is missing,
/// non-numeric or out of bounds.
pub fn validate_memory_pressure_params(
    data: &Value,
    bounds: &ValidationBounds,
) -> Result<MemoryPressureParams, AppError> {
    let data = as_object(data, "memory pressure")?;

    let size_mb = validate_bounded(data.get("sizeMb"), "sizeMb", bounds.min_memory_mb, bounds.max_memory_mb)?;

    Ok(MemoryPressureParams { size_mb })
}

/// Validate `{durationSeconds, concurrentWorkers}`
///
/// Duration is strict. The worker count never fails: a missing,
/// non-numeric or non-positive value becomes the configured default, and
/// the result is capped at `max_blocking_workers`.
///
/// # Errors
///
/// Fails when `data` is not an object or `durationSeconds` is invalid.
pub fn validate_blocking_params(data: &Value, bounds: &ValidationBounds) -> Result<BlockingParams, AppError> {
    let data = as_object(data, "blocking")?;

    let duration_seconds = validate_bounded(
        data.get("durationSeconds"),
        "durationSeconds",
        bounds.min_duration_seconds,
        bounds.max_duration_seconds,
    )?;

    let requested = match coerce(data.get("concurrentWorkers")) {
        Coerced::Integer(n) if n >= 1 => n.unsigned_abs(),
        _ => bounds.default_blocking_workers,
    };

    Ok(BlockingParams {
        duration_seconds,
        concurrent_workers: requested.min(bounds.max_blocking_workers),
    })
}

/// Validate `{delaySeconds, blockingPattern}`
///
/// An unknown or missing pattern silently becomes [`BlockingPattern::Sleep`].
///
/// # Errors
///
/// Fails when `data` is not an object or `delaySeconds` is invalid.
pub fn validate_slow_request_params(data: &Value, bounds: &ValidationBounds) -> Result<SlowRequestParams, AppError> {
    let data = as_object(data, "slow request")?;

    let delay_seconds = validate_bounded(
        data.get("delaySeconds"),
        "delaySeconds",
        bounds.min_duration_seconds,
        bounds.max_duration_seconds,
    )?;

    let blocking_pattern = data
        .get("blockingPattern")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    Ok(SlowRequestParams {
        delay_seconds,
        blocking_pattern,
    })
}
