//! Review Service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::dto::request::CreateReviewRequest;
use crate::domain::{Principal, Review, ReviewRepository, TourRepository};
use crate::infrastructure::repositories::Repositories;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Review service trait.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Reviews of a tour, newest first.
    async fn reviews(&self, tour_id: i64) -> Result<Vec<Review>, ReviewError>;

    /// Leave a review as the calling tourist.
    async fn create_review(
        &self,
        tourist: &Principal,
        tour_id: i64,
        request: CreateReviewRequest,
    ) -> Result<Review, ReviewError>;
}

/// Review service errors.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Tour not found")]
    TourNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ReviewError {
    fn from(err: AppError) -> Self {
        ReviewError::Internal(err.to_string())
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        let message = err.to_string();
        match err {
            ReviewError::TourNotFound => AppError::NotFound(message),
            ReviewError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Review service implementation.
pub struct ReviewServiceImpl {
    reviews: Arc<dyn ReviewRepository>,
    tours: Arc<dyn TourRepository>,
    snowflake: Arc<SnowflakeGenerator>,
}

impl ReviewServiceImpl {
    pub fn new(repos: &Repositories, snowflake: Arc<SnowflakeGenerator>) -> Self {
        Self {
            reviews: repos.reviews.clone(),
            tours: repos.tours.clone(),
            snowflake,
        }
    }

    async fn ensure_tour(&self, tour_id: i64) -> Result<(), ReviewError> {
        match self.tours.find_by_id(tour_id).await? {
            Some(_) => Ok(()),
            None => Err(ReviewError::TourNotFound),
        }
    }
}

#[async_trait]
impl ReviewService for ReviewServiceImpl {
    async fn reviews(&self, tour_id: i64) -> Result<Vec<Review>, ReviewError> {
        self.ensure_tour(tour_id).await?;
        Ok(self.reviews.find_by_tour(tour_id).await?)
    }

    async fn create_review(
        &self,
        tourist: &Principal,
        tour_id: i64,
        request: CreateReviewRequest,
    ) -> Result<Review, ReviewError> {
        self.ensure_tour(tour_id).await?;

        let now = Utc::now();
        let review = Review {
            id: self.snowflake.generate(),
            tour_id,
            tourist_id: tourist.user_id.value(),
            rating: request.rating,
            comment: request.comment,
            visit_date: request.visit_date,
            images: request.images,
            created_at: now,
            updated_at: now,
        };
        Ok(self.reviews.create(&review).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, Tour, UserId};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_review_round() {
        let repos = Repositories::in_memory();
        repos
            .tours
            .create(&Tour::new_draft(5, 1, "t".into(), "d".into(), 1, vec![]))
            .await
            .unwrap();
        let svc = ReviewServiceImpl::new(&repos, Arc::new(SnowflakeGenerator::new(1, 3)));
        let tourist = Principal::new(UserId(9), Some(Role::Tourist));

        let request = CreateReviewRequest {
            rating: 5,
            comment: "Lovely".into(),
            visit_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            images: vec!["https://img/1.jpg".into()],
        };
        let review = svc.create_review(&tourist, 5, request.clone()).await.unwrap();
        assert_eq!(review.tourist_id, 9);
        assert_eq!(svc.reviews(5).await.unwrap().len(), 1);

        assert!(matches!(
            svc.create_review(&tourist, 6, request).await,
            Err(ReviewError::TourNotFound)
        ));
    }
}
