//! HTTP request handlers.
//!
//! This module re-exports handlers from focused submodules.

pub mod generate;
pub mod health;

// Re-export handlers from submodules (including utoipa __path types for OpenAPI)
pub use generate::{__path_generate_activities, generate_activities};
pub use health::{__path_health_check, health_check, not_found};
