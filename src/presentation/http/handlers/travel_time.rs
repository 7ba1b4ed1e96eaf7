//! Travel Time Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::CreateTravelTimeRequest;
use crate::application::dto::response::MessageResponse;
use crate::domain::{Principal, TravelTime};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

pub async fn list_travel_times(
    State(state): State<AppState>,
    Path(tour_id): Path<String>,
) -> Result<Json<Vec<TravelTime>>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    Ok(Json(state.catalog.travel_times(tour_id).await?))
}

/// Create or replace the estimate for one transport type
pub async fn upsert_travel_time(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tour_id): Path<String>,
    ValidatedJson(body): ValidatedJson<CreateTravelTimeRequest>,
) -> Result<(StatusCode, Json<TravelTime>), AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    let travel_time = state
        .catalog
        .upsert_travel_time(&principal, tour_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(travel_time)))
}

pub async fn delete_travel_time(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((tour_id, travel_time_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    let travel_time_id = parse_id(&travel_time_id, "travel time")?;

    state
        .catalog
        .delete_travel_time(&principal, tour_id, travel_time_id)
        .await?;
    Ok(Json(MessageResponse::new("Travel time deleted successfully")))
}
