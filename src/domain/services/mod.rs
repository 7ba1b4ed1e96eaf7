//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong to a
//! single entity.
//!
//! - **proximity**: geofence rules and key-point matching
//! - **entitlement**: the purchase verification contract
//! - **access**: role lookup contract for the access gate

pub mod access;
pub mod entitlement;
pub mod proximity;

pub use access::RoleResolver;
pub use entitlement::{Entitlement, EntitlementError, PurchaseVerifier};
pub use proximity::{KeyPointMatcher, MatchStrategy, ProximityMetric, ProximityRule};
