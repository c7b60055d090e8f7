//! Validate-or-fail checks for simulation request parameters
//!
//! Every function takes untyped JSON input and either returns a typed,
//! bounds-checked value or an [`AppError::Validation`]. Required fields
//! fail loudly with machine-readable details. Operational knobs such as
//! the worker count or blocking pattern fall back to a safe default
//! instead of failing.
//!
//! [`AppError::Validation`]: stress_core::AppError::Validation

mod identifier;
mod numeric;
mod params;

pub use identifier::validate_uuid;
pub use numeric::{validate_integer, validate_optional_integer};
pub use params::{
    BlockingParams, BlockingPattern, CpuStressParams, MemoryPressureParams, SlowRequestParams,
    validate_blocking_params, validate_cpu_stress_params, validate_memory_pressure_params,
    validate_slow_request_params,
};
