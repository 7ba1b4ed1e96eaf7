//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **Coordinates**: WGS84 position with Haversine distance helpers
//! - **UserId / Role / Principal**: the verified caller

mod geo;
mod principal;

pub use geo::*;
pub use principal::*;
