//! Review Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::CreateReviewRequest;
use crate::domain::{Principal, Review};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

/// Reviews of a tour
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(tour_id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    Ok(Json(state.reviews.reviews(tour_id).await?))
}

pub async fn create_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tour_id): Path<String>,
    ValidatedJson(body): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let tour_id = parse_id(&tour_id, "tour")?;
    let review = state.reviews.create_review(&principal, tour_id, body).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
