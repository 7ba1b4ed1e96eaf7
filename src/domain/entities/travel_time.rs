//! Travel time entity and repository trait.
//!
//! Maps to the `travel_times` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Means of transport a duration estimate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Walking,
    Bicycle,
    Car,
}

impl TransportType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "walking" => Some(Self::Walking),
            "bicycle" => Some(Self::Bicycle),
            "car" => Some(Self::Car),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Bicycle => "bicycle",
            Self::Car => "car",
        }
    }
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Estimated duration of a tour for one transport type.
///
/// Maps to the `travel_times` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - tour_id: BIGINT NOT NULL REFERENCES tours(id) ON DELETE CASCADE
/// - transport_type: VARCHAR(20) NOT NULL
/// - duration_min: INTEGER NOT NULL CHECK (duration_min > 0)
/// - UNIQUE (tour_id, transport_type)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelTime {
    pub id: i64,
    pub tour_id: i64,
    pub transport_type: TransportType,
    pub duration_min: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for TravelTime data access operations.
#[async_trait]
pub trait TravelTimeRepository: Send + Sync {
    async fn find_by_tour(&self, tour_id: i64) -> Result<Vec<TravelTime>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<TravelTime>, AppError>;

    /// Insert, or overwrite the duration of the existing (tour, transport) row.
    async fn upsert(&self, travel_time: &TravelTime) -> Result<TravelTime, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn count_by_tour(&self, tour_id: i64) -> Result<i64, AppError>;
}
