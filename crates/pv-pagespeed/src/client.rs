//! HTTP-backed PageSpeed Insights client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use pv_types::{AppError, AppResult, PerformanceMetrics};
use pv_utils::{retry_with_backoff, RetryPolicy};

use crate::extract::{extract_metrics, PagespeedResponse};
use crate::PerformanceAuditor;

const PAGESPEED_API_BASE: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// The analysis strategy and category are fixed: the dashboard only tracks
/// mobile performance.
const STRATEGY: &str = "mobile";
const CATEGORY: &str = "performance";

/// Maximum audit attempts per URL.
pub const MAX_ATTEMPTS: u32 = 3;

/// First-attempt timeout. PageSpeed audits routinely take several seconds.
pub const BASE_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(6);

/// Each retry gets this much more time than the previous attempt, on the
/// theory that a slow-but-healthy upstream finishes given a longer leash.
pub const TIMEOUT_STEP: Duration = Duration::from_secs(2);

/// Backoff base between failed attempts: 1s, 2s, 4s.
pub const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// PageSpeed Insights client with bounded retries.
pub struct PageSpeedClient {
    api_key: Option<String>,
    client: Client,
    base_url: String,
    base_attempt_timeout: Duration,
    timeout_step: Duration,
    backoff_base: Duration,
}

impl PageSpeedClient {
    /// Create a client. Without an API key requests go out unauthenticated
    /// and are subject to Google's anonymous quota.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: Client::new(),
            base_url: PAGESPEED_API_BASE.to_string(),
            base_attempt_timeout: BASE_ATTEMPT_TIMEOUT,
            timeout_step: TIMEOUT_STEP,
            backoff_base: BACKOFF_BASE,
        }
    }

    /// Override the API base URL (tests point this at a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Shrink the retry timing. The schedule keeps its shape (linear
    /// per-attempt timeouts, doubling backoff); only the scale changes, so
    /// tests can exercise it without waiting wall-clock seconds.
    pub fn with_timing(
        mut self,
        base_attempt_timeout: Duration,
        timeout_step: Duration,
        backoff_base: Duration,
    ) -> Self {
        self.base_attempt_timeout = base_attempt_timeout;
        self.timeout_step = timeout_step;
        self.backoff_base = backoff_base;
        self
    }

    /// Timeout for attempt `n` (1-indexed): 6s, 8s, 10s at default scale.
    pub fn attempt_timeout(&self, attempt: u32) -> Duration {
        self.base_attempt_timeout + self.timeout_step * attempt.saturating_sub(1)
    }

    async fn audit_once(&self, url: &str, attempt: u32) -> AppResult<PerformanceMetrics> {
        let timeout = self.attempt_timeout(attempt);
        debug!(url, attempt, timeout_s = timeout.as_secs(), "running audit attempt");

        match tokio::time::timeout(timeout, self.request(url)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::AuditTimeout),
        }
    }

    async fn request(&self, url: &str) -> AppResult<PerformanceMetrics> {
        let mut query: Vec<(&str, &str)> = vec![
            ("url", url),
            ("strategy", STRATEGY),
            ("category", CATEGORY),
        ];
        if let Some(key) = &self.api_key {
            query.push(("key", key));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::Audit(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimitExceeded);
        }
        if !status.is_success() {
            // Capture the body for diagnostics; PageSpeed error bodies name
            // the failing document.
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Audit(format!("API error ({}): {}", status, body)));
        }

        let parsed: PagespeedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Audit(format!("Failed to parse response: {}", e)))?;

        extract_metrics(&parsed)
    }
}

#[async_trait]
impl PerformanceAuditor for PageSpeedClient {
    async fn audit(&self, url: &str) -> AppResult<PerformanceMetrics> {
        let policy = RetryPolicy::new(MAX_ATTEMPTS, self.backoff_base);

        // Rate limits are retried here like any other failed attempt; the
        // distinct variant only matters once attempts are exhausted, so the
        // HTTP boundary can answer 429.
        let result = retry_with_backoff(
            policy,
            |err| err.is_retryable() || matches!(err, AppError::RateLimitExceeded),
            |attempt| self.audit_once(url, attempt),
        )
        .await;

        match &result {
            Ok(metrics) => {
                info!(url, score = ?metrics.performance_score, "audit completed");
            }
            Err(err) => {
                info!(url, "audit failed after retries: {}", err);
            }
        }

        result
    }
}
