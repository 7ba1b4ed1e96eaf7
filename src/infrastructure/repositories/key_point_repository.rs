//! Key Point Repository Implementation
//!
//! PostgreSQL implementation of the KeyPointRepository trait. `order` is a
//! reserved word and is always quoted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{KeyPoint, KeyPointRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct KeyPointRow {
    id: i64,
    tour_id: i64,
    name: String,
    description: String,
    latitude: f64,
    longitude: f64,
    image_url: Option<String>,
    #[sqlx(rename = "order")]
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl KeyPointRow {
    fn into_key_point(self) -> KeyPoint {
        KeyPoint {
            id: self.id,
            tour_id: self.tour_id,
            name: self.name,
            description: self.description,
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self.image_url,
            order: self.sort_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const KEY_POINT_COLUMNS: &str = r#"id, tour_id, name, description, latitude, longitude, image_url, "order", created_at, updated_at"#;

/// PostgreSQL key point repository implementation.
#[derive(Clone)]
pub struct PgKeyPointRepository {
    pool: PgPool,
}

impl PgKeyPointRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyPointRepository for PgKeyPointRepository {
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<KeyPoint>, AppError> {
        let rows = sqlx::query_as::<_, KeyPointRow>(&format!(
            r#"SELECT {KEY_POINT_COLUMNS} FROM key_points WHERE tour_id = $1 ORDER BY "order" ASC, id ASC"#
        ))
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(KeyPointRow::into_key_point).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<KeyPoint>, AppError> {
        let row = sqlx::query_as::<_, KeyPointRow>(&format!(
            "SELECT {KEY_POINT_COLUMNS} FROM key_points WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(KeyPointRow::into_key_point))
    }

    async fn find_first(&self, tour_id: i64) -> Result<Option<KeyPoint>, AppError> {
        let row = sqlx::query_as::<_, KeyPointRow>(&format!(
            r#"SELECT {KEY_POINT_COLUMNS} FROM key_points WHERE tour_id = $1 AND "order" = 1 ORDER BY id LIMIT 1"#
        ))
        .bind(tour_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(KeyPointRow::into_key_point))
    }

    async fn create(&self, key_point: &KeyPoint) -> Result<KeyPoint, AppError> {
        let row = sqlx::query_as::<_, KeyPointRow>(&format!(
            r#"
            INSERT INTO key_points (id, tour_id, name, description, latitude, longitude,
                                    image_url, "order", created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {KEY_POINT_COLUMNS}
            "#
        ))
        .bind(key_point.id)
        .bind(key_point.tour_id)
        .bind(&key_point.name)
        .bind(&key_point.description)
        .bind(key_point.latitude)
        .bind(key_point.longitude)
        .bind(&key_point.image_url)
        .bind(key_point.order)
        .bind(key_point.created_at)
        .bind(key_point.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_key_point())
    }

    async fn update(&self, key_point: &KeyPoint) -> Result<KeyPoint, AppError> {
        let row = sqlx::query_as::<_, KeyPointRow>(&format!(
            r#"
            UPDATE key_points
            SET name = $2, description = $3, latitude = $4, longitude = $5,
                image_url = $6, "order" = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {KEY_POINT_COLUMNS}
            "#
        ))
        .bind(key_point.id)
        .bind(&key_point.name)
        .bind(&key_point.description)
        .bind(key_point.latitude)
        .bind(key_point.longitude)
        .bind(&key_point.image_url)
        .bind(key_point.order)
        .fetch_optional(&self.pool)
        .await?;

        row.map(KeyPointRow::into_key_point)
            .ok_or_else(|| AppError::NotFound("Key point not found".into()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM key_points WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_tour(&self, tour_id: i64) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM key_points WHERE tour_id = $1")
            .bind(tour_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
