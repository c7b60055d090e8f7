use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;
use serde_json::{Value, json};
use stress_core::{AppError, Details};
use stress_validation::{
    validate_blocking_params, validate_cpu_stress_params, validate_memory_pressure_params,
    validate_optional_integer, validate_slow_request_params, validate_uuid,
};
use uuid::Uuid;

use crate::extract::{JsonBody, QueryObject};
use crate::fault::Fault;
use crate::registry::{Event, Simulation, SimulationKind};
use crate::state::AppState;

type Started = (StatusCode, Json<Simulation>);

pub async fn start_cpu_stress(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<Started, Fault> {
    let params = validate_cpu_stress_params(&body, &state.bounds)?;

    let simulation = state.registry.start(
        SimulationKind::CpuStress,
        serde_json::to_value(params)?,
        Some(params.duration_seconds),
    )?;

    Ok((StatusCode::ACCEPTED, Json(simulation)))
}

pub async fn start_memory_pressure(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Started, Fault> {
    let params = validate_memory_pressure_params(&body, &state.bounds)?;

    // Allocations are held until released
    let simulation = state
        .registry
        .start(SimulationKind::MemoryPressure, serde_json::to_value(params)?, None)?;

    Ok((StatusCode::ACCEPTED, Json(simulation)))
}

pub async fn start_blocking(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<Started, Fault> {
    let params = validate_blocking_params(&body, &state.bounds)?;

    let simulation = state.registry.start(
        SimulationKind::Blocking,
        serde_json::to_value(params)?,
        Some(params.duration_seconds),
    )?;

    Ok((StatusCode::ACCEPTED, Json(simulation)))
}

pub async fn start_slow_request(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<Started, Fault> {
    let params = validate_slow_request_params(&body, &state.bounds)?;

    let simulation = state.registry.start(
        SimulationKind::SlowRequest,
        serde_json::to_value(params)?,
        Some(params.delay_seconds),
    )?;

    Ok((StatusCode::ACCEPTED, Json(simulation)))
}

pub async fn list_simulations(State(state): State<AppState>) -> Json<Vec<Simulation>> {
    Json(state.registry.list())
}

pub async fn get_simulation(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Simulation>, Fault> {
    let id = parse_id(id)?;

    state.registry.get(id).map(Json).ok_or_else(|| not_found(id))
}

pub async fn stop_simulation(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Simulation>, Fault> {
    let id = parse_id(id)?;

    state.registry.stop(id).map(Json).ok_or_else(|| not_found(id))
}

pub async fn list_events(
    State(state): State<AppState>,
    QueryObject(query): QueryObject,
) -> Result<Json<Vec<Event>>, Fault> {
    let capacity = i64::try_from(state.registry.event_capacity()).unwrap_or(i64::MAX);
    let limit = validate_optional_integer(query.get("limit"), "limit", 1, capacity, capacity)?;

    // Bounds above guarantee a positive value
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);

    Ok(Json(state.registry.events(limit)))
}

fn parse_id(raw: String) -> Result<Uuid, Fault> {
    let raw = validate_uuid(Some(&Value::String(raw)), "id")?;

    match Uuid::parse_str(&raw) {
        Ok(id) => Ok(id),
        Err(error) => Err(Fault::unexpected(error)),
    }
}

fn not_found(id: Uuid) -> Fault {
    let mut details = Details::new();
    details.insert("id".to_owned(), json!(id));

    AppError::not_found("Simulation not found").with_details(details).into()
}
