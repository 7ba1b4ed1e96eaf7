//! Key Point Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{CreateKeyPointRequest, UpdateKeyPointRequest};
use crate::application::dto::response::MessageResponse;
use crate::domain::{KeyPoint, Principal};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

/// Key points of a tour in walking order
pub async fn list_key_points(
    State(state): State<AppState>,
    Path(tour_id): Path<String>,
) -> Result<Json<Vec<KeyPoint>>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    Ok(Json(state.catalog.key_points(tour_id).await?))
}

/// The key point with order 1
pub async fn first_key_point(
    State(state): State<AppState>,
    Path(tour_id): Path<String>,
) -> Result<Json<KeyPoint>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    Ok(Json(state.catalog.first_key_point(tour_id).await?))
}

pub async fn create_key_point(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tour_id): Path<String>,
    ValidatedJson(body): ValidatedJson<CreateKeyPointRequest>,
) -> Result<(StatusCode, Json<KeyPoint>), AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    let key_point = state.catalog.add_key_point(&principal, tour_id, body).await?;
    Ok((StatusCode::CREATED, Json(key_point)))
}

pub async fn update_key_point(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tour_id, key_point_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<UpdateKeyPointRequest>,
) -> Result<Json<KeyPoint>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    let key_point_id = parse_id(&key_point_id, "key point")?;

    let key_point = state
        .catalog
        .update_key_point(&principal, tour_id, key_point_id, body)
        .await?;
    Ok(Json(key_point))
}

pub async fn delete_key_point(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tour_id, key_point_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    let key_point_id = parse_id(&key_point_id, "key point")?;

    state
        .catalog
        .delete_key_point(&principal, tour_id, key_point_id)
        .await?;
    Ok(Json(MessageResponse::new("Key point deleted successfully")))
}
