use serde::Deserialize;

pub const MIN_DURATION_SECONDS: u64 = 1;
pub const MIN_MEMORY_MB: u64 = 1;
pub const MIN_CPU_LOAD_PERCENT: u64 = 1;
pub const MAX_CPU_LOAD_PERCENT: u64 = 100;

/// Configurable upper limits for simulation parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default = "default_max_duration_seconds")]
    pub max_simulation_duration_seconds: u64,
    #[serde(default = "default_max_memory_mb")]
    pub max_memory_allocation_mb: u64,
    /// Worker count used when a request omits or garbles `concurrentWorkers`
    #[serde(default = "default_blocking_workers")]
    pub default_blocking_workers: u64,
    /// Hard ceiling for `concurrentWorkers`; larger requests are clamped
    #[serde(default = "default_max_blocking_workers")]
    pub max_blocking_workers: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_simulation_duration_seconds: default_max_duration_seconds(),
            max_memory_allocation_mb: default_max_memory_mb(),
            default_blocking_workers: default_blocking_workers(),
            max_blocking_workers: default_max_blocking_workers(),
        }
    }
}

const fn default_max_duration_seconds() -> u64 {
    86_400
}

const fn default_max_memory_mb() -> u64 {
    65_536
}

const fn default_blocking_workers() -> u64 {
    1
}

const fn default_max_blocking_workers() -> u64 {
    100
}

/// Immutable bounds shared by every validator for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationBounds {
    pub min_duration_seconds: u64,
    pub max_duration_seconds: u64,
    pub min_memory_mb: u64,
    pub max_memory_mb: u64,
    pub min_cpu_load_percent: u64,
    pub max_cpu_load_percent: u64,
    pub default_blocking_workers: u64,
    pub max_blocking_workers: u64,
}

impl ValidationBounds {
    pub const fn from_limits(limits: &LimitsConfig) -> Self {
        Self {
            min_duration_seconds: MIN_DURATION_SECONDS,
            max_duration_seconds: limits.max_simulation_duration_seconds,
            min_memory_mb: MIN_MEMORY_MB,
            max_memory_mb: limits.max_memory_allocation_mb,
            min_cpu_load_percent: MIN_CPU_LOAD_PERCENT,
            max_cpu_load_percent: MAX_CPU_LOAD_PERCENT,
            default_blocking_workers: limits.default_blocking_workers,
            max_blocking_workers: limits.max_blocking_workers,
        }
    }
}

impl Default for ValidationBounds {
    fn default() -> Self {
        Self::from_limits(&LimitsConfig::default())
    }
}
