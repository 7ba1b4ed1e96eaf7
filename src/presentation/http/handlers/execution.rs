//! Tour Execution Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::LocationRequest;
use crate::application::dto::response::{
    ActiveExecutionResponse, CompletedKeyPointsResponse, ExecutionMessageResponse,
    KeyPointCompletionResponse, LocationUpdateResponse, StartExecutionResponse,
};
use crate::application::services::ExecutionError;
use crate::domain::Principal;
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

/// Start a purchased tour at the caller's position
pub async fn start_tour(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tour_id): Path<String>,
    ValidatedJson(body): ValidatedJson<LocationRequest>,
) -> Result<(StatusCode, Json<StartExecutionResponse>), AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;

    let started = state
        .executions
        .start(&principal, tour_id, body.coordinates())
        .await?;

    Ok((StatusCode::CREATED, Json(started.into())))
}

/// The caller's active execution with its tour and progress
pub async fn get_active(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ActiveExecutionResponse>, AppError> {
    let view = state.executions.get_active(&principal).await?;
    Ok(Json(view.into()))
}

/// Location heartbeat with geofence check
pub async fn update_location(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(execution_id): Path<String>,
    ValidatedJson(body): ValidatedJson<LocationRequest>,
) -> Result<Json<LocationUpdateResponse>, AppError> {
    let execution_id = parse_id(&execution_id, "execution")?;

    let update = state
        .executions
        .update_location(&principal, execution_id, body.coordinates())
        .await?;

    Ok(Json(update.into()))
}

/// Completion records of an execution
pub async fn completed_key_points(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(execution_id): Path<String>,
) -> Result<Json<CompletedKeyPointsResponse>, AppError> {
    let execution_id = parse_id(&execution_id, "execution")?;

    let completed_keypoints = state
        .executions
        .completed_key_points(&principal, execution_id)
        .await?;

    Ok(Json(CompletedKeyPointsResponse {
        completed_keypoints,
    }))
}

/// Manually mark a key point as reached
pub async fn complete_key_point(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((execution_id, key_point_id)): Path<(String, String)>,
) -> Result<Json<KeyPointCompletionResponse>, AppError> {
    let execution_id = parse_id(&execution_id, "execution")?;
    let key_point_id = parse_id(&key_point_id, "key point")?;

    let update = state
        .executions
        .complete_key_point(&principal, execution_id, key_point_id)
        .await?;

    let keypoint = update
        .key_point
        .ok_or_else(|| AppError::from(ExecutionError::KeyPointNotFound))?;

    Ok(Json(KeyPointCompletionResponse {
        message: "Key point completed".into(),
        keypoint,
        completed: update.newly_completed,
    }))
}

/// Finish the tour
pub async fn complete_execution(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(execution_id): Path<String>,
) -> Result<Json<ExecutionMessageResponse>, AppError> {
    let execution_id = parse_id(&execution_id, "execution")?;
    let execution = state.executions.complete(&principal, execution_id).await?;

    Ok(Json(ExecutionMessageResponse {
        message: "Tour completed successfully".into(),
        execution,
    }))
}

/// Give up on the tour
pub async fn abandon_execution(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(execution_id): Path<String>,
) -> Result<Json<ExecutionMessageResponse>, AppError> {
    let execution_id = parse_id(&execution_id, "execution")?;
    let execution = state.executions.abandon(&principal, execution_id).await?;

    Ok(Json(ExecutionMessageResponse {
        message: "Tour abandoned".into(),
        execution,
    }))
}
