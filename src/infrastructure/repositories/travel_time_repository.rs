//! Travel Time Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{TransportType, TravelTime, TravelTimeRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct TravelTimeRow {
    id: i64,
    tour_id: i64,
    transport_type: String,
    duration_min: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TravelTimeRow {
    fn into_travel_time(self) -> Result<TravelTime, AppError> {
        let transport_type = TransportType::parse(&self.transport_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown transport type '{}'", self.transport_type))
        })?;
        Ok(TravelTime {
            id: self.id,
            tour_id: self.tour_id,
            transport_type,
            duration_min: self.duration_min,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// PostgreSQL travel time repository implementation.
#[derive(Clone)]
pub struct PgTravelTimeRepository {
    pool: PgPool,
}

impl PgTravelTimeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TravelTimeRepository for PgTravelTimeRepository {
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<TravelTime>, AppError> {
        let rows = sqlx::query_as::<_, TravelTimeRow>(
            r#"
            SELECT id, tour_id, transport_type, duration_min, created_at, updated_at
            FROM travel_times
            WHERE tour_id = $1
            ORDER BY transport_type
            "#,
        )
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TravelTimeRow::into_travel_time).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TravelTime>, AppError> {
        let row = sqlx::query_as::<_, TravelTimeRow>(
            r#"
            SELECT id, tour_id, transport_type, duration_min, created_at, updated_at
            FROM travel_times
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TravelTimeRow::into_travel_time).transpose()
    }

    async fn upsert(&self, travel_time: &TravelTime) -> Result<TravelTime, AppError> {
        let row = sqlx::query_as::<_, TravelTimeRow>(
            r#"
            INSERT INTO travel_times (id, tour_id, transport_type, duration_min, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (tour_id, transport_type)
            DO UPDATE SET duration_min = EXCLUDED.duration_min, updated_at = NOW()
            RETURNING id, tour_id, transport_type, duration_min, created_at, updated_at
            "#,
        )
        .bind(travel_time.id)
        .bind(travel_time.tour_id)
        .bind(travel_time.transport_type.as_str())
        .bind(travel_time.duration_min)
        .bind(travel_time.created_at)
        .bind(travel_time.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_travel_time()
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM travel_times WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_tour(&self, tour_id: i64) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM travel_times WHERE tour_id = $1")
            .bind(tour_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
