//! Response models for the admin HTTP surface
//!
//! DTOs serialized as JSON by the `/health` and `/stats` endpoints.

pub mod responses;

// Re-export commonly used types
pub use responses::{HealthResponse, StatsResponse};
