//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod execution;
pub mod health;
pub mod key_point;
pub mod review;
pub mod tour;
pub mod travel_time;
