//! Review Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::domain::{Review, ReviewRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    tour_id: i64,
    tourist_id: i64,
    rating: i16,
    comment: String,
    visit_date: NaiveDate,
    images: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            tour_id: row.tour_id,
            tourist_id: row.tourist_id,
            rating: row.rating,
            comment: row.comment,
            visit_date: row.visit_date,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL review repository implementation.
#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<Review>, AppError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, tour_id, tourist_id, rating, comment, visit_date, images,
                   created_at, updated_at
            FROM reviews
            WHERE tour_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (id, tour_id, tourist_id, rating, comment, visit_date, images,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, tour_id, tourist_id, rating, comment, visit_date, images,
                      created_at, updated_at
            "#,
        )
        .bind(review.id)
        .bind(review.tour_id)
        .bind(review.tourist_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.visit_date)
        .bind(&review.images)
        .bind(review.created_at)
        .bind(review.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
