//! Shared types for PageVitals
//!
//! Error types, performance metric records, and the persisted entity shapes
//! used across the workspace.

pub mod errors;
pub mod metrics;
pub mod records;

pub use errors::{AppError, AppResult};
pub use metrics::PerformanceMetrics;
pub use records::{AnalysisRecord, MonitoredTarget, QuickTestRecord, RequestLogEntry};
