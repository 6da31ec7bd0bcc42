//! Performance auditor for PageVitals
//!
//! Wraps the Google PageSpeed Insights API behind the [`PerformanceAuditor`]
//! trait. Two implementations exist: [`PageSpeedClient`] does real HTTP with
//! bounded retries and per-attempt timeouts, [`FixtureAuditor`] serves
//! deterministic canned audits for local development and tests. Which one
//! backs the server is decided once at startup by configuration.

mod client;
mod extract;
mod fixture;

pub use client::{PageSpeedClient, BACKOFF_BASE, BASE_ATTEMPT_TIMEOUT, MAX_ATTEMPTS, TIMEOUT_STEP};
pub use extract::{extract_metrics, PagespeedResponse};
pub use fixture::FixtureAuditor;

use async_trait::async_trait;

use pv_types::{AppResult, PerformanceMetrics};

/// A source of performance audits for a URL.
#[async_trait]
pub trait PerformanceAuditor: Send + Sync {
    /// Run one audit of `url`, tolerating transient upstream failures.
    ///
    /// Metrics the audit did not report come back as `None`; mapping absence
    /// to a default happens at the storage boundary, not here.
    async fn audit(&self, url: &str) -> AppResult<PerformanceMetrics>;
}
