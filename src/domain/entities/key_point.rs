//! Key point entity and repository trait.
//!
//! Maps to the `key_points` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Coordinates;
use crate::shared::error::AppError;

/// An ordered waypoint on a tour.
///
/// Maps to the `key_points` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - tour_id: BIGINT NOT NULL REFERENCES tours(id) ON DELETE CASCADE
/// - name: VARCHAR(255) NOT NULL
/// - description: TEXT NOT NULL
/// - latitude / longitude: DOUBLE PRECISION NOT NULL
/// - image_url: TEXT NULL
/// - "order": INTEGER NOT NULL (not necessarily contiguous)
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyPoint {
    pub id: i64,
    pub tour_id: i64,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KeyPoint {
    /// Order value of the entry point of a tour.
    pub const FIRST_ORDER: i32 = 1;

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn is_first(&self) -> bool {
        self.order == Self::FIRST_ORDER
    }
}

/// Repository trait for KeyPoint data access operations.
#[async_trait]
pub trait KeyPointRepository: Send + Sync {
    /// Key points of a tour in stored order (`order` ascending, then id).
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<KeyPoint>, AppError>;

    /// Find a key point by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<KeyPoint>, AppError>;

    /// The key point with order 1, if any.
    async fn find_first(&self, tour_id: i64) -> Result<Option<KeyPoint>, AppError>;

    async fn create(&self, key_point: &KeyPoint) -> Result<KeyPoint, AppError>;

    async fn update(&self, key_point: &KeyPoint) -> Result<KeyPoint, AppError>;

    /// Delete a key point. Returns false if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn count_by_tour(&self, tour_id: i64) -> Result<i64, AppError>;
}
