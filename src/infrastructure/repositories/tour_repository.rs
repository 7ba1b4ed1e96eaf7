//! Tour Repository Implementation
//!
//! PostgreSQL implementation of the TourRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Tour, TourRepository, TourStatus};
use crate::shared::error::AppError;

/// Database row representation matching the tours table schema.
#[derive(Debug, sqlx::FromRow)]
struct TourRow {
    id: i64,
    name: String,
    description: String,
    difficulty: i16,
    tags: Vec<String>,
    price: f64,
    status: String,
    total_length_km: f64,
    author_id: i64,
    published_at: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TourRow {
    /// Convert database row to domain Tour entity.
    fn into_tour(self) -> Tour {
        Tour {
            id: self.id,
            name: self.name,
            description: self.description,
            difficulty: self.difficulty,
            tags: self.tags,
            price: self.price,
            status: TourStatus::parse(&self.status).unwrap_or_default(),
            total_length_km: self.total_length_km,
            author_id: self.author_id,
            published_at: self.published_at,
            archived_at: self.archived_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const TOUR_COLUMNS: &str = "id, name, description, difficulty, tags, price, status, \
     total_length_km, author_id, published_at, archived_at, created_at, updated_at";

/// PostgreSQL tour repository implementation.
#[derive(Clone)]
pub struct PgTourRepository {
    pool: PgPool,
}

impl PgTourRepository {
    /// Create a new PgTourRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TourRepository for PgTourRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tour>, AppError> {
        let row = sqlx::query_as::<_, TourRow>(&format!(
            "SELECT {TOUR_COLUMNS} FROM tours WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TourRow::into_tour))
    }

    async fn find_by_status(&self, status: TourStatus) -> Result<Vec<Tour>, AppError> {
        let rows = sqlx::query_as::<_, TourRow>(&format!(
            "SELECT {TOUR_COLUMNS} FROM tours WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TourRow::into_tour).collect())
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Tour>, AppError> {
        let rows = sqlx::query_as::<_, TourRow>(&format!(
            "SELECT {TOUR_COLUMNS} FROM tours WHERE author_id = $1 ORDER BY created_at DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TourRow::into_tour).collect())
    }

    async fn create(&self, tour: &Tour) -> Result<Tour, AppError> {
        let row = sqlx::query_as::<_, TourRow>(&format!(
            r#"
            INSERT INTO tours (id, name, description, difficulty, tags, price, status,
                               total_length_km, author_id, published_at, archived_at,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {TOUR_COLUMNS}
            "#
        ))
        .bind(tour.id)
        .bind(&tour.name)
        .bind(&tour.description)
        .bind(tour.difficulty)
        .bind(&tour.tags)
        .bind(tour.price)
        .bind(tour.status.as_str())
        .bind(tour.total_length_km)
        .bind(tour.author_id)
        .bind(tour.published_at)
        .bind(tour.archived_at)
        .bind(tour.created_at)
        .bind(tour.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_tour())
    }

    async fn update(&self, tour: &Tour) -> Result<Tour, AppError> {
        let row = sqlx::query_as::<_, TourRow>(&format!(
            r#"
            UPDATE tours
            SET name = $2, description = $3, difficulty = $4, tags = $5, price = $6,
                status = $7, published_at = $8, archived_at = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {TOUR_COLUMNS}
            "#
        ))
        .bind(tour.id)
        .bind(&tour.name)
        .bind(&tour.description)
        .bind(tour.difficulty)
        .bind(&tour.tags)
        .bind(tour.price)
        .bind(tour.status.as_str())
        .bind(tour.published_at)
        .bind(tour.archived_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TourRow::into_tour)
            .ok_or_else(|| AppError::NotFound("Tour not found".into()))
    }

    async fn set_total_length(&self, id: i64, total_length_km: f64) -> Result<(), AppError> {
        sqlx::query("UPDATE tours SET total_length_km = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(total_length_km)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
