//! PageVitals HTTP server
//!
//! Routes, middleware, and state for the monitoring API. The binary in
//! `main.rs` wires configuration, storage, and the auditor together and
//! hands the router to axum.

pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

pub use routes::build_router;
pub use state::AppState;
