//! REST API endpoint tests, driven through the real router.

mod execution_tests;
mod health_tests;
mod tour_tests;
