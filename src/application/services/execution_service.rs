//! Tour Execution Service
//!
//! Drives a tourist's walk through a tour: start (behind the purchase gate),
//! location pings with geofenced key-point completion, and the two terminal
//! transitions. All state lives in the store; every mutation is a single
//! conditional statement in the repository.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::config::ExecutionSettings;
use crate::domain::services::{Entitlement, EntitlementError, KeyPointMatcher, PurchaseVerifier};
use crate::domain::{
    CompletedKeyPoint, Coordinates, KeyPoint, KeyPointRepository, Principal, Termination, Tour,
    TourExecution, TourExecutionRepository, TourRepository, TourStatus,
};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::Repositories;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Execution service trait defining the tour execution operations.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Start a purchased, startable tour for the caller.
    async fn start(
        &self,
        principal: &Principal,
        tour_id: i64,
        start: Coordinates,
    ) -> Result<StartedExecution, ExecutionError>;

    /// The caller's active execution joined with its tour and progress.
    async fn get_active(&self, principal: &Principal) -> Result<ActiveExecutionView, ExecutionError>;

    /// Heartbeat plus geofence check against the tour's key points.
    async fn update_location(
        &self,
        principal: &Principal,
        execution_id: i64,
        position: Coordinates,
    ) -> Result<LocationUpdate, ExecutionError>;

    /// Record a key point as reached without a proximity check.
    async fn complete_key_point(
        &self,
        principal: &Principal,
        execution_id: i64,
        key_point_id: i64,
    ) -> Result<LocationUpdate, ExecutionError>;

    /// Completions of one of the caller's executions.
    async fn completed_key_points(
        &self,
        principal: &Principal,
        execution_id: i64,
    ) -> Result<Vec<CompletedKeyPoint>, ExecutionError>;

    /// Active -> Completed.
    async fn complete(&self, principal: &Principal, execution_id: i64) -> Result<TourExecution, ExecutionError>;

    /// Active -> Abandoned.
    async fn abandon(&self, principal: &Principal, execution_id: i64) -> Result<TourExecution, ExecutionError>;
}

/// A freshly started execution and the entitlement that allowed it.
#[derive(Debug, Clone)]
pub struct StartedExecution {
    pub execution: TourExecution,
    pub entitlement: Entitlement,
}

/// Everything a client needs to resume an active tour.
#[derive(Debug, Clone)]
pub struct ActiveExecutionView {
    pub execution: TourExecution,
    pub tour: Tour,
    pub key_points: Vec<KeyPoint>,
    pub completions: Vec<CompletedKeyPoint>,
}

/// Outcome of a location ping.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationUpdate {
    /// Key point matched this tick, if any
    pub key_point: Option<KeyPoint>,
    /// Whether a new completion row was written
    pub newly_completed: bool,
}

impl LocationUpdate {
    pub fn nothing() -> Self {
        Self {
            key_point: None,
            newly_completed: false,
        }
    }
}

/// Execution service errors.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("You must purchase this tour before starting it")]
    NotPurchased,

    #[error("Failed to verify purchase: {0}")]
    PurchaseUnavailable(#[from] EntitlementError),

    #[error("Tour not found")]
    TourNotFound,

    #[error("Tour is not available for execution (status: {0})")]
    TourNotAvailable(TourStatus),

    #[error("You already have an active tour execution")]
    AlreadyActive,

    #[error("Tour execution not found")]
    NotFound,

    #[error("No active tour execution")]
    NoActiveExecution,

    #[error("Tour execution belongs to another tourist")]
    Forbidden,

    #[error("Tour execution is not active")]
    NotActive,

    #[error("Key point not found")]
    KeyPointNotFound,

    #[error("Key point does not belong to this tour")]
    KeyPointNotOnTour,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ExecutionError {
    fn from(err: AppError) -> Self {
        ExecutionError::Internal(err.to_string())
    }
}

impl From<ExecutionError> for AppError {
    fn from(err: ExecutionError) -> Self {
        let message = err.to_string();
        match err {
            ExecutionError::NotPurchased | ExecutionError::Forbidden => AppError::Forbidden(message),
            ExecutionError::PurchaseUnavailable(_) => AppError::ServiceUnavailable(message),
            ExecutionError::TourNotFound
            | ExecutionError::NotFound
            | ExecutionError::NoActiveExecution
            | ExecutionError::KeyPointNotFound => AppError::NotFound(message),
            ExecutionError::TourNotAvailable(_)
            | ExecutionError::NotActive
            | ExecutionError::KeyPointNotOnTour => AppError::BadRequest(message),
            ExecutionError::AlreadyActive => AppError::Conflict(message),
            ExecutionError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Execution service implementation.
pub struct ExecutionServiceImpl {
    executions: Arc<dyn TourExecutionRepository>,
    tours: Arc<dyn TourRepository>,
    key_points: Arc<dyn KeyPointRepository>,
    purchases: Arc<dyn PurchaseVerifier>,
    snowflake: Arc<SnowflakeGenerator>,
    matcher: KeyPointMatcher,
    allow_archived_start: bool,
}

impl ExecutionServiceImpl {
    pub fn new(
        repos: &Repositories,
        purchases: Arc<dyn PurchaseVerifier>,
        snowflake: Arc<SnowflakeGenerator>,
        settings: &ExecutionSettings,
    ) -> Self {
        Self {
            executions: repos.executions.clone(),
            tours: repos.tours.clone(),
            key_points: repos.key_points.clone(),
            purchases,
            snowflake,
            matcher: settings.matcher(),
            allow_archived_start: settings.allow_archived_start,
        }
    }

    /// Load an execution the caller owns, in any status.
    async fn owned_execution(&self, principal: &Principal, execution_id: i64) -> Result<TourExecution, ExecutionError> {
        let execution = self
            .executions
            .find_by_id(execution_id)
            .await?
            .ok_or(ExecutionError::NotFound)?;

        if !execution.is_owned_by(principal.user_id.value()) {
            return Err(ExecutionError::Forbidden);
        }
        Ok(execution)
    }

    /// Explain why a conditional update on an execution matched no row.
    async fn classify_miss(&self, principal: &Principal, execution_id: i64) -> ExecutionError {
        match self.owned_execution(principal, execution_id).await {
            Ok(_) => ExecutionError::NotActive,
            Err(e) => e,
        }
    }

    async fn verify_entitlement(&self, principal: &Principal, tour_id: i64) -> Result<Entitlement, ExecutionError> {
        let started = Instant::now();
        let result = self.purchases.verify_purchase(principal.user_id, tour_id).await;
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(entitlement) if entitlement.has_purchased => {
                metrics::record_purchase_verification("purchased", elapsed);
                Ok(entitlement)
            }
            Ok(_) => {
                metrics::record_purchase_verification("not_purchased", elapsed);
                Err(ExecutionError::NotPurchased)
            }
            Err(e) => {
                metrics::record_purchase_verification("error", elapsed);
                warn!(error = %e, "Purchase verification failed");
                Err(ExecutionError::PurchaseUnavailable(e))
            }
        }
    }

    async fn record(&self, execution_id: i64, key_point_id: i64, trigger: &str) -> Result<bool, ExecutionError> {
        let now = Utc::now();
        let completion = CompletedKeyPoint {
            id: self.snowflake.generate(),
            execution_id,
            key_point_id,
            completed_at: now,
            created_at: now,
        };
        let inserted = self.executions.record_completion(&completion).await?;
        if inserted {
            metrics::record_key_point_completed(trigger);
            info!(execution_id, key_point_id, trigger, "Key point completed");
        }
        Ok(inserted)
    }

    async fn finish(
        &self,
        principal: &Principal,
        execution_id: i64,
        how: Termination,
    ) -> Result<TourExecution, ExecutionError> {
        self.owned_execution(principal, execution_id).await?;

        match self.executions.terminate(execution_id, how, Utc::now()).await? {
            Some(execution) => {
                metrics::record_execution_event(how.as_str());
                info!(execution_id, status = how.as_str(), "Tour execution finished");
                Ok(execution)
            }
            None => Err(ExecutionError::NotActive),
        }
    }
}

#[async_trait]
impl ExecutionService for ExecutionServiceImpl {
    #[instrument(skip(self, principal), fields(tourist_id = %principal.user_id))]
    async fn start(
        &self,
        principal: &Principal,
        tour_id: i64,
        start: Coordinates,
    ) -> Result<StartedExecution, ExecutionError> {
        let entitlement = self.verify_entitlement(principal, tour_id).await?;

        let tour = self
            .tours
            .find_by_id(tour_id)
            .await?
            .ok_or(ExecutionError::TourNotFound)?;

        if !tour.is_startable(self.allow_archived_start) {
            return Err(ExecutionError::TourNotAvailable(tour.status));
        }

        let tourist_id = principal.user_id.value();
        if self.executions.find_active_by_tourist(tourist_id).await?.is_some() {
            return Err(ExecutionError::AlreadyActive);
        }

        let candidate = TourExecution::start(self.snowflake.generate(), tour_id, tourist_id, start, Utc::now());

        // The partial unique index decides races between concurrent starts.
        let execution = self
            .executions
            .create_active(&candidate)
            .await?
            .ok_or(ExecutionError::AlreadyActive)?;

        metrics::record_execution_event("started");
        info!(execution_id = execution.id, "Tour execution started");

        Ok(StartedExecution {
            execution,
            entitlement,
        })
    }

    #[instrument(skip(self, principal), fields(tourist_id = %principal.user_id))]
    async fn get_active(&self, principal: &Principal) -> Result<ActiveExecutionView, ExecutionError> {
        let execution = self
            .executions
            .find_active_by_tourist(principal.user_id.value())
            .await?
            .ok_or(ExecutionError::NoActiveExecution)?;

        let tour = self
            .tours
            .find_by_id(execution.tour_id)
            .await?
            .ok_or(ExecutionError::TourNotFound)?;
        let key_points = self.key_points.find_by_tour(execution.tour_id).await?;
        let completions = self.executions.find_completions(execution.id).await?;

        Ok(ActiveExecutionView {
            execution,
            tour,
            key_points,
            completions,
        })
    }

    #[instrument(skip(self, principal, position), fields(tourist_id = %principal.user_id))]
    async fn update_location(
        &self,
        principal: &Principal,
        execution_id: i64,
        position: Coordinates,
    ) -> Result<LocationUpdate, ExecutionError> {
        let touched = self
            .executions
            .touch_active(execution_id, principal.user_id.value(), Utc::now())
            .await?;

        let execution = match touched {
            Some(execution) => execution,
            None => return Err(self.classify_miss(principal, execution_id).await),
        };

        let key_points = self.key_points.find_by_tour(execution.tour_id).await?;
        let completed: HashSet<i64> = self
            .executions
            .find_completions(execution.id)
            .await?
            .into_iter()
            .map(|c| c.key_point_id)
            .collect();

        let Some(key_point) = self.matcher.find_match(&position, &key_points, &completed) else {
            debug!("No key point in range");
            return Ok(LocationUpdate::nothing());
        };

        let key_point = key_point.clone();
        let newly_completed = self.record(execution.id, key_point.id, "proximity").await?;

        Ok(LocationUpdate {
            key_point: Some(key_point),
            newly_completed,
        })
    }

    #[instrument(skip(self, principal), fields(tourist_id = %principal.user_id))]
    async fn complete_key_point(
        &self,
        principal: &Principal,
        execution_id: i64,
        key_point_id: i64,
    ) -> Result<LocationUpdate, ExecutionError> {
        let execution = self.owned_execution(principal, execution_id).await?;
        if !execution.is_active() {
            return Err(ExecutionError::NotActive);
        }

        let key_point = self
            .key_points
            .find_by_id(key_point_id)
            .await?
            .ok_or(ExecutionError::KeyPointNotFound)?;
        if key_point.tour_id != execution.tour_id {
            return Err(ExecutionError::KeyPointNotOnTour);
        }

        let newly_completed = self.record(execution.id, key_point.id, "manual").await?;

        if self
            .executions
            .touch_active(execution.id, execution.tourist_id, Utc::now())
            .await?
            .is_none()
        {
            // Finished concurrently; the completion row stays.
            debug!("Execution left active state during manual completion");
        }

        Ok(LocationUpdate {
            key_point: Some(key_point),
            newly_completed,
        })
    }

    async fn completed_key_points(
        &self,
        principal: &Principal,
        execution_id: i64,
    ) -> Result<Vec<CompletedKeyPoint>, ExecutionError> {
        let execution = self.owned_execution(principal, execution_id).await?;
        Ok(self.executions.find_completions(execution.id).await?)
    }

    #[instrument(skip(self, principal), fields(tourist_id = %principal.user_id))]
    async fn complete(&self, principal: &Principal, execution_id: i64) -> Result<TourExecution, ExecutionError> {
        self.finish(principal, execution_id, Termination::Completed).await
    }

    #[instrument(skip(self, principal), fields(tourist_id = %principal.user_id))]
    async fn abandon(&self, principal: &Principal, execution_id: i64) -> Result<TourExecution, ExecutionError> {
        self.finish(principal, execution_id, Termination::Abandoned).await
    }
}
