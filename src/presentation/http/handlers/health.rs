//! Health Check Handlers
//!
//! - `GET /health` - static status and version
//! - `GET /health/live` - liveness probe
//! - `GET /health/ready` - dependency checks for the tours database, Redis
//!   and the purchases service

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Instant;

use crate::infrastructure::cache::Cache;
use crate::infrastructure::database;
use crate::startup::AppState;

/// Server start time for uptime calculation
static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);
static SERVER_START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Initialize the server start time (call during startup)
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
    Lazy::force(&SERVER_START_TIME);
}

/// Static health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health check response
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub checks: HealthChecks,
}

/// Individual dependency checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: ServiceHealth,
    pub redis: ServiceHealth,
    pub purchases: ServiceHealth,
}

/// Health status for individual services
#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceHealth {
    fn not_configured() -> Self {
        Self {
            status: HealthStatus::Healthy,
            latency_ms: None,
            message: Some("not configured".into()),
        }
    }

    fn timed(started: Instant, degraded_after_ms: u64) -> Self {
        let latency = started.elapsed().as_millis() as u64;
        Self {
            status: if latency < degraded_after_ms {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            latency_ms: Some(latency),
            message: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            latency_ms: None,
            message: Some(message),
        }
    }
}

/// Overall health status
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Simple liveness response
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// Always healthy while the process serves requests
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "alive" })
}

/// Readiness probe. 503 only when the tours database is down; a failing
/// cache or purchases service reports `degraded`.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let (database, redis, purchases) = tokio::join!(
        check_database(&state),
        check_redis(&state),
        check_purchases(&state),
    );
    let status = determine_overall_status(&database, &redis, &purchases);

    let code = if status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let body = DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: SERVER_START.elapsed().as_secs(),
        started_at: SERVER_START_TIME.to_rfc3339(),
        checks: HealthChecks {
            database,
            redis,
            purchases,
        },
    };

    (code, Json(body))
}

/// Check database connectivity and latency
async fn check_database(state: &AppState) -> ServiceHealth {
    let Some(db) = &state.backends.db else {
        return ServiceHealth::not_configured();
    };
    let start = Instant::now();
    match database::ping(db).await {
        Ok(()) => ServiceHealth::timed(start, 100),
        Err(e) => ServiceHealth::failed(format!("Database connection failed: {}", e)),
    }
}

/// Check Redis connectivity and latency
async fn check_redis(state: &AppState) -> ServiceHealth {
    let Some(cache) = &state.backends.cache else {
        return ServiceHealth::not_configured();
    };
    let start = Instant::now();
    match cache.ping().await {
        Ok(()) => ServiceHealth::timed(start, 50),
        Err(e) => ServiceHealth::failed(format!("Redis connection failed: {}", e)),
    }
}

/// Check that the purchases channel can be established
async fn check_purchases(state: &AppState) -> ServiceHealth {
    let start = Instant::now();
    if state.purchases.is_reachable().await {
        ServiceHealth::timed(start, 200)
    } else {
        ServiceHealth::failed("Purchases service unreachable".into())
    }
}

/// Determine overall health based on individual checks
fn determine_overall_status(
    db: &ServiceHealth,
    redis: &ServiceHealth,
    purchases: &ServiceHealth,
) -> HealthStatus {
    // The database is the only hard dependency
    if db.status == HealthStatus::Unhealthy {
        return HealthStatus::Unhealthy;
    }

    // Anything else only degrades
    if [db, redis, purchases]
        .iter()
        .any(|s| s.status != HealthStatus::Healthy)
    {
        return HealthStatus::Degraded;
    }

    HealthStatus::Healthy
}
