use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use fleetsim_core::MissionStatus;
use fleetsim_fleet::CancelOutcome;
use fleetsim_sim::SimError;

use crate::state::AppState;

pub async fn list_robots(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "robots": state.fleet.all() }))
}

pub async fn get_robot(
    State(state): State<Arc<AppState>>,
    Path(robot_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state
        .fleet
        .get(&robot_id)
        .map(|robot| Json(json!(robot)))
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn cancel_robot_mission(
    State(state): State<Arc<AppState>>,
    Path(robot_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.fleet.cancel_mission(&robot_id) {
        CancelOutcome::NotFound => Err(StatusCode::NOT_FOUND),
        CancelOutcome::AlreadyIdle => Ok(Json(json!({ "cancelled": true, "mission_id": null }))),
        CancelOutcome::Cancelled { mission_id } => {
            // Mirror the cancellation on the mission record
            if let Err(e) = state.missions.cancel(&mission_id) {
                error!(mission_id = %mission_id, error = %e, "mission-side cancel failed");
            }
            Ok(Json(json!({ "cancelled": true, "mission_id": mission_id })))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MissionListQuery {
    pub status: Option<MissionStatus>,
    pub limit: Option<usize>,
}

pub async fn list_missions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MissionListQuery>,
) -> Json<Value> {
    let mut missions = match query.status {
        Some(status) => state.missions.by_status(status),
        None => state.missions.all(),
    };
    if let Some(limit) = query.limit {
        missions.truncate(limit);
    }
    Json(json!({ "missions": missions }))
}

pub async fn list_active_missions(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "missions": state.missions.active() }))
}

pub async fn get_mission(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state
        .missions
        .get(&mission_id)
        .map(|mission| Json(json!(mission)))
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.dashboard.snapshot()))
}

pub async fn statistics(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.fleet.statistics()))
}

pub async fn start_simulation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, StatusCode> {
    match state.scheduler.start() {
        Ok(()) => Ok(Json(json!({ "status": "started" }))),
        Err(SimError::AlreadyRunning) => Err(StatusCode::CONFLICT),
        Err(e) => {
            error!(error = %e, "failed to start simulation");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn stop_simulation(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.scheduler.stop();
    Json(json!({ "status": "stopped" }))
}
