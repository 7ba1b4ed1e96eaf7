//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits, plus in-memory
//! equivalents for tests and local wiring.
//!
//! ## Available Repositories
//!
//! - **TourRepository** - Tours and their lifecycle columns
//! - **KeyPointRepository** - Ordered waypoints
//! - **TravelTimeRepository** - Duration estimates (upsert per transport type)
//! - **ReviewRepository** - Tourist reviews
//! - **TourExecutionRepository** - Executions and key-point completions
//! - **PgUserRoleRepository** - Role lookups in the stakeholders database
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use tour_service::infrastructure::repositories::Repositories;
//!
//! fn wire(pool: PgPool) -> Repositories {
//!     Repositories::postgres(pool)
//! }
//! ```

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::{
    KeyPointRepository, ReviewRepository, TourExecutionRepository, TourRepository,
    TravelTimeRepository,
};

pub mod execution_repository;
pub mod key_point_repository;
pub mod memory;
pub mod review_repository;
pub mod tour_repository;
pub mod travel_time_repository;
pub mod user_role_repository;

pub use execution_repository::PgTourExecutionRepository;
pub use key_point_repository::PgKeyPointRepository;
pub use memory::{
    InMemoryKeyPointRepository, InMemoryReviewRepository, InMemoryTourExecutionRepository,
    InMemoryTourRepository, InMemoryTravelTimeRepository,
};
pub use review_repository::PgReviewRepository;
pub use tour_repository::PgTourRepository;
pub use travel_time_repository::PgTravelTimeRepository;
pub use user_role_repository::PgUserRoleRepository;

/// The set of repositories the application services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub tours: Arc<dyn TourRepository>,
    pub key_points: Arc<dyn KeyPointRepository>,
    pub travel_times: Arc<dyn TravelTimeRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub executions: Arc<dyn TourExecutionRepository>,
}

impl Repositories {
    /// Postgres-backed repositories sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            tours: Arc::new(PgTourRepository::new(pool.clone())),
            key_points: Arc::new(PgKeyPointRepository::new(pool.clone())),
            travel_times: Arc::new(PgTravelTimeRepository::new(pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(pool.clone())),
            executions: Arc::new(PgTourExecutionRepository::new(pool)),
        }
    }

    /// Fresh, empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            tours: Arc::new(InMemoryTourRepository::new()),
            key_points: Arc::new(InMemoryKeyPointRepository::new()),
            travel_times: Arc::new(InMemoryTravelTimeRepository::new()),
            reviews: Arc::new(InMemoryReviewRepository::new()),
            executions: Arc::new(InMemoryTourExecutionRepository::new()),
        }
    }
}
