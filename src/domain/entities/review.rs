//! Review entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A tourist's rating of a tour they visited.
///
/// Maps to the `reviews` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - tour_id: BIGINT NOT NULL REFERENCES tours(id) ON DELETE CASCADE
/// - tourist_id: BIGINT NOT NULL
/// - rating: SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5)
/// - comment: TEXT NOT NULL
/// - visit_date: DATE NOT NULL
/// - images: TEXT[] NOT NULL DEFAULT '{}'
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: i64,
    pub tour_id: i64,
    pub tourist_id: i64,
    pub rating: i16,
    pub comment: String,
    pub visit_date: NaiveDate,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for Review data access operations.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Reviews of a tour, newest first.
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<Review>, AppError>;

    async fn create(&self, review: &Review) -> Result<Review, AppError>;
}
