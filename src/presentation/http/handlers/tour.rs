//! Tour Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{CreateTourRequest, UpdateTourRequest};
use crate::application::dto::response::{MessageResponse, TourForTouristResponse};
use crate::domain::{Principal, Tour, TourStatus};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

/// Published tours
pub async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<Tour>>, AppError> {
    Ok(Json(state.catalog.list_published().await?))
}

/// Published tours with their entry key point
pub async fn tours_for_tourists(
    State(state): State<AppState>,
) -> Result<Json<Vec<TourForTouristResponse>>, AppError> {
    let tours = state.catalog.tours_for_tourists().await?;
    Ok(Json(tours.into_iter().map(Into::into).collect()))
}

/// Tours in a given lifecycle state
pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Tour>>, AppError> {
    let status = TourStatus::parse(&status)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid tour status: {}", status)))?;
    Ok(Json(state.catalog.list_by_status(status).await?))
}

pub async fn get_tour(
    State(state): State<AppState>,
    Path(tour_id): Path<String>,
) -> Result<Json<Tour>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    Ok(Json(state.catalog.get_tour(tour_id).await?))
}

/// Tours authored by the calling guide
pub async fn my_tours(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Tour>>, AppError> {
    Ok(Json(state.catalog.my_tours(&principal).await?))
}

/// Create a draft tour
pub async fn create_tour(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(body): ValidatedJson<CreateTourRequest>,
) -> Result<(StatusCode, Json<Tour>), AppError> {
    let tour = state.catalog.create_tour(&principal, body).await?;
    Ok((StatusCode::CREATED, Json(tour)))
}

pub async fn update_tour(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tour_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateTourRequest>,
) -> Result<Json<Tour>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    Ok(Json(state.catalog.update_tour(&principal, tour_id, body).await?))
}

pub async fn delete_tour(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tour_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    state.catalog.delete_tour(&principal, tour_id).await?;
    Ok(Json(MessageResponse::new("Tour deleted successfully")))
}

pub async fn publish_tour(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tour_id): Path<String>,
) -> Result<Json<Tour>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    Ok(Json(state.catalog.publish_tour(&principal, tour_id).await?))
}

pub async fn archive_tour(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tour_id): Path<String>,
) -> Result<Json<Tour>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    Ok(Json(state.catalog.archive_tour(&principal, tour_id).await?))
}
