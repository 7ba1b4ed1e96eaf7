//! # Tour Service Library
//!
//! This crate provides the tour catalog and tour execution service:
//! - RESTful HTTP API endpoints for tours, key points, travel times and reviews
//! - Tour execution tracking with geofenced key-point completion
//! - Purchase verification against the purchases service over gRPC
//! - PostgreSQL for persistent storage, Redis for role caching
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities, repository traits and domain rules
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database, cache, gRPC and metrics implementations
//! - **Presentation Layer**: HTTP handlers, routes and middleware
//!
//! ## Module Structure
//!
//! ```text
//! tour_service/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities, value objects, and traits
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Database, cache, gRPC and metrics
//! +-- presentation/  HTTP routes and middleware
//! +-- shared/        Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
