//! API Module
//!
//! Optional admin HTTP surface for health checks and statistics.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache and connection statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
