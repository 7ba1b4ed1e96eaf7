//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL, plus in-memory equivalents)
//! - Cache implementations (Redis)
//! - The purchases gRPC client
//! - Prometheus metrics

pub mod cache;
pub mod database;
pub mod grpc;
pub mod metrics;
pub mod repositories;
