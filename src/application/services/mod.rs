//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **ExecutionService**: Tour execution lifecycle and geofenced key-point tracking
//! - **CatalogService**: Tours, key points, travel times, publish/archive
//! - **ReviewService**: Tour reviews

pub mod catalog_service;
pub mod execution_service;
pub mod review_service;

pub use catalog_service::{CatalogError, CatalogService, CatalogServiceImpl, TourSummary};
pub use execution_service::{
    ActiveExecutionView, ExecutionError, ExecutionService, ExecutionServiceImpl, LocationUpdate,
    StartedExecution,
};
pub use review_service::{ReviewError, ReviewService, ReviewServiceImpl};
