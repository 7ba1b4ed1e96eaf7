//! # Domain Entities
//!
//! Core domain entities of the tour service. All entities map directly to
//! their corresponding database tables.
//!
//! ## Catalog
//!
//! - **Tour**: a guide-authored tour with a draft/published/archived lifecycle
//! - **KeyPoint**: an ordered, geolocated waypoint on a tour
//! - **TravelTime**: duration estimate per transport type
//! - **Review**: a tourist's rating of a visited tour
//!
//! ## Execution
//!
//! - **TourExecution**: a tourist's in-progress (or finished) walk of a tour
//! - **CompletedKeyPoint**: a key point reached during an execution
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod key_point;
mod review;
mod tour;
mod tour_execution;
mod travel_time;

pub use key_point::{KeyPoint, KeyPointRepository};
pub use review::{Review, ReviewRepository};
pub use tour::{
    Tour, TourRepository, TourStatus, MIN_KEY_POINTS_TO_PUBLISH, MIN_TRAVEL_TIMES_TO_PUBLISH,
};
pub use tour_execution::{
    CompletedKeyPoint, ExecutionStatus, Termination, TourExecution, TourExecutionRepository,
};
pub use travel_time::{TransportType, TravelTime, TravelTimeRepository};

#[cfg(test)]
pub use tour_execution::MockTourExecutionRepository;
