//! Tour Execution Repository Implementation
//!
//! PostgreSQL implementation of the TourExecutionRepository trait.
//!
//! Concurrency relies on the schema rather than on locks held here:
//! - `uq_tour_executions_active_tourist`, a partial unique index on
//!   `(tourist_id) WHERE status = 'active'`, rejects a second active execution
//! - `UNIQUE (execution_id, key_point_id)` makes completions idempotent
//! - transitions carry `status = 'active'` in their WHERE clause

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    CompletedKeyPoint, ExecutionStatus, Termination, TourExecution, TourExecutionRepository,
};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ExecutionRow {
    id: i64,
    tour_id: i64,
    tourist_id: i64,
    status: String,
    start_latitude: f64,
    start_longitude: f64,
    last_activity: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    abandoned_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExecutionRow {
    fn into_execution(self) -> Result<TourExecution, AppError> {
        let status = ExecutionStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown execution status '{}'", self.status))
        })?;
        Ok(TourExecution {
            id: self.id,
            tour_id: self.tour_id,
            tourist_id: self.tourist_id,
            status,
            start_latitude: self.start_latitude,
            start_longitude: self.start_longitude,
            last_activity: self.last_activity,
            completed_at: self.completed_at,
            abandoned_at: self.abandoned_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompletionRow {
    id: i64,
    execution_id: i64,
    key_point_id: i64,
    completed_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<CompletionRow> for CompletedKeyPoint {
    fn from(row: CompletionRow) -> Self {
        CompletedKeyPoint {
            id: row.id,
            execution_id: row.execution_id,
            key_point_id: row.key_point_id,
            completed_at: row.completed_at,
            created_at: row.created_at,
        }
    }
}

const EXECUTION_COLUMNS: &str = "id, tour_id, tourist_id, status, start_latitude, start_longitude, \
     last_activity, completed_at, abandoned_at, created_at, updated_at";

/// PostgreSQL tour execution repository implementation.
#[derive(Clone)]
pub struct PgTourExecutionRepository {
    pool: PgPool,
}

impl PgTourExecutionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TourExecutionRepository for PgTourExecutionRepository {
    async fn create_active(&self, execution: &TourExecution) -> Result<Option<TourExecution>, AppError> {
        let row = sqlx::query_as::<_, ExecutionRow>(&format!(
            r#"
            INSERT INTO tour_executions (id, tour_id, tourist_id, status, start_latitude,
                                         start_longitude, last_activity, created_at, updated_at)
            VALUES ($1, $2, $3, 'active', $4, $5, $6, $7, $7)
            ON CONFLICT (tourist_id) WHERE status = 'active' DO NOTHING
            RETURNING {EXECUTION_COLUMNS}
            "#
        ))
        .bind(execution.id)
        .bind(execution.tour_id)
        .bind(execution.tourist_id)
        .bind(execution.start_latitude)
        .bind(execution.start_longitude)
        .bind(execution.last_activity)
        .bind(execution.created_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExecutionRow::into_execution).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TourExecution>, AppError> {
        let row = sqlx::query_as::<_, ExecutionRow>(&format!(
            "SELECT {EXECUTION_COLUMNS} FROM tour_executions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExecutionRow::into_execution).transpose()
    }

    async fn find_active_by_tourist(&self, tourist_id: i64) -> Result<Option<TourExecution>, AppError> {
        let row = sqlx::query_as::<_, ExecutionRow>(&format!(
            r#"
            SELECT {EXECUTION_COLUMNS}
            FROM tour_executions
            WHERE tourist_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(tourist_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExecutionRow::into_execution).transpose()
    }

    async fn touch_active(
        &self,
        id: i64,
        tourist_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<TourExecution>, AppError> {
        let row = sqlx::query_as::<_, ExecutionRow>(&format!(
            r#"
            UPDATE tour_executions
            SET last_activity = $3, updated_at = $3
            WHERE id = $1 AND tourist_id = $2 AND status = 'active'
            RETURNING {EXECUTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(tourist_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExecutionRow::into_execution).transpose()
    }

    async fn terminate(
        &self,
        id: i64,
        how: Termination,
        at: DateTime<Utc>,
    ) -> Result<Option<TourExecution>, AppError> {
        let stamp_column = match how {
            Termination::Completed => "completed_at",
            Termination::Abandoned => "abandoned_at",
        };

        let row = sqlx::query_as::<_, ExecutionRow>(&format!(
            r#"
            UPDATE tour_executions
            SET status = $2, {stamp_column} = $3, updated_at = $3
            WHERE id = $1 AND status = 'active'
            RETURNING {EXECUTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(how.as_str())
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExecutionRow::into_execution).transpose()
    }

    async fn record_completion(&self, completion: &CompletedKeyPoint) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO completed_key_points (id, execution_id, key_point_id, completed_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (execution_id, key_point_id) DO NOTHING
            "#,
        )
        .bind(completion.id)
        .bind(completion.execution_id)
        .bind(completion.key_point_id)
        .bind(completion.completed_at)
        .bind(completion.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_completions(&self, execution_id: i64) -> Result<Vec<CompletedKeyPoint>, AppError> {
        let rows = sqlx::query_as::<_, CompletionRow>(
            r#"
            SELECT id, execution_id, key_point_id, completed_at, created_at
            FROM completed_key_points
            WHERE execution_id = $1
            ORDER BY completed_at ASC, id ASC
            "#,
        )
        .bind(execution_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CompletedKeyPoint::from).collect())
    }

    async fn tour_has_executions(&self, tour_id: i64) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tour_executions WHERE tour_id = $1)")
                .bind(tour_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn key_point_has_completions(&self, key_point_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM completed_key_points WHERE key_point_id = $1)",
        )
        .bind(key_point_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
