//! # Domain Layer
//!
//! The domain layer contains the core business logic of the tour service.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Tours, key points, travel times, reviews and executions
//! - **value_objects**: Coordinates and the verified principal
//! - **services**: Geofence matching and the contracts for purchase
//!   verification and role lookup
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate lifecycle rules

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
