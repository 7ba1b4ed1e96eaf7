//! Tour execution entity, key-point completions and repository trait.
//!
//! Maps to the `tour_executions` and `completed_key_points` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Coordinates;
use crate::shared::error::AppError;

/// Execution lifecycle. `Completed` and `Abandoned` are terminal.
///
/// ```text
/// Active --complete--> Completed
/// Active --abandon---> Abandoned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Active,
    Completed,
    Abandoned,
}

impl ExecutionStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two ways an active execution can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Completed,
    Abandoned,
}

impl Termination {
    pub fn status(&self) -> ExecutionStatus {
        match self {
            Self::Completed => ExecutionStatus::Completed,
            Self::Abandoned => ExecutionStatus::Abandoned,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.status().as_str()
    }
}

/// One tourist's walk through a tour.
///
/// Maps to the `tour_executions` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - tour_id: BIGINT NOT NULL REFERENCES tours(id)
/// - tourist_id: BIGINT NOT NULL
/// - status: VARCHAR(20) NOT NULL DEFAULT 'active'
/// - start_latitude / start_longitude: DOUBLE PRECISION NOT NULL
/// - last_activity: TIMESTAMPTZ NOT NULL
/// - completed_at / abandoned_at: TIMESTAMPTZ NULL
/// - UNIQUE (tourist_id) WHERE status = 'active'
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourExecution {
    pub id: i64,
    pub tour_id: i64,
    pub tourist_id: i64,
    pub status: ExecutionStatus,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub last_activity: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub abandoned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TourExecution {
    /// A new active execution starting at `start`.
    pub fn start(id: i64, tour_id: i64, tourist_id: i64, start: Coordinates, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tour_id,
            tourist_id,
            status: ExecutionStatus::Active,
            start_latitude: start.latitude,
            start_longitude: start.longitude,
            last_activity: now,
            completed_at: None,
            abandoned_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ExecutionStatus::Active
    }

    pub fn is_owned_by(&self, tourist_id: i64) -> bool {
        self.tourist_id == tourist_id
    }

    /// Apply a terminal transition in memory. Returns false if not active.
    pub fn terminate(&mut self, how: Termination, now: DateTime<Utc>) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = how.status();
        match how {
            Termination::Completed => self.completed_at = Some(now),
            Termination::Abandoned => self.abandoned_at = Some(now),
        }
        self.updated_at = now;
        true
    }
}

/// Record of a key point reached during an execution.
///
/// Maps to the `completed_key_points` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - execution_id: BIGINT NOT NULL REFERENCES tour_executions(id) ON DELETE CASCADE
/// - key_point_id: BIGINT NOT NULL REFERENCES key_points(id) ON DELETE RESTRICT
/// - completed_at: TIMESTAMPTZ NOT NULL
/// - UNIQUE (execution_id, key_point_id)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletedKeyPoint {
    pub id: i64,
    pub execution_id: i64,
    pub key_point_id: i64,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for TourExecution data access operations.
///
/// Every mutating method is a single conditional statement; callers never
/// read-modify-write execution rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TourExecutionRepository: Send + Sync {
    /// Insert an active execution unless the tourist already has one.
    ///
    /// Returns `None` when another active execution exists for the tourist.
    async fn create_active(&self, execution: &TourExecution) -> Result<Option<TourExecution>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<TourExecution>, AppError>;

    /// Most recently created active execution of a tourist.
    async fn find_active_by_tourist(&self, tourist_id: i64) -> Result<Option<TourExecution>, AppError>;

    /// Refresh `last_activity` if the execution is active and owned by `tourist_id`.
    async fn touch_active(
        &self,
        id: i64,
        tourist_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<TourExecution>, AppError>;

    /// Terminate an active execution. Returns `None` if it is not active.
    async fn terminate(
        &self,
        id: i64,
        how: Termination,
        at: DateTime<Utc>,
    ) -> Result<Option<TourExecution>, AppError>;

    /// Record a completion. Returns false if it was already recorded.
    async fn record_completion(&self, completion: &CompletedKeyPoint) -> Result<bool, AppError>;

    /// Completions of an execution ordered by completion time.
    async fn find_completions(&self, execution_id: i64) -> Result<Vec<CompletedKeyPoint>, AppError>;

    /// Whether any execution, in any status, references the tour.
    async fn tour_has_executions(&self, tour_id: i64) -> Result<bool, AppError>;

    /// Whether any execution has completed the key point.
    async fn key_point_has_completions(&self, key_point_id: i64) -> Result<bool, AppError>;
}
