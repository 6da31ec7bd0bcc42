//! Response shapes and metric extraction
//!
//! Only the fields we read are modeled; the PageSpeed response is large and
//! everything else is ignored during deserialization.

use std::collections::HashMap;

use serde::Deserialize;

use pv_types::{AppError, AppResult, PerformanceMetrics};

const AUDIT_FCP: &str = "first-contentful-paint";
const AUDIT_LCP: &str = "largest-contentful-paint";
const AUDIT_SPEED_INDEX: &str = "speed-index";
const AUDIT_TBT: &str = "total-blocking-time";
const AUDIT_CLS: &str = "cumulative-layout-shift";
const AUDIT_INTERACTIVE: &str = "interactive";

#[derive(Debug, Deserialize)]
pub struct PagespeedResponse {
    #[serde(rename = "lighthouseResult")]
    pub lighthouse_result: Option<LighthouseResult>,

    /// Error object embedded in an HTTP 200 body. Present means the audit
    /// failed regardless of status code.
    pub error: Option<EmbeddedError>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedError {
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LighthouseResult {
    pub categories: Categories,
    #[serde(default)]
    pub audits: HashMap<String, AuditValue>,
}

#[derive(Debug, Deserialize)]
pub struct Categories {
    pub performance: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct Category {
    /// Normalized 0-1 composite score.
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AuditValue {
    #[serde(rename = "numericValue")]
    pub numeric_value: Option<f64>,
}

/// Scale the upstream 0-1 score to 0-100, rounding to nearest.
fn round_score(score: f64) -> u8 {
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Round a millisecond value to the nearest whole millisecond.
fn round_ms(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

/// CLS is unitless and reported to 3 decimal places.
fn round_cls(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Pull the metric set out of a parsed response.
///
/// A missing audit yields `None` for that metric, never zero. A response with
/// an embedded error object, or with no lighthouse result at all, is an audit
/// failure.
pub fn extract_metrics(response: &PagespeedResponse) -> AppResult<PerformanceMetrics> {
    if let Some(err) = &response.error {
        return Err(AppError::Audit(match err.code {
            Some(code) => format!("PageSpeed API error ({}): {}", code, err.message),
            None => format!("PageSpeed API error: {}", err.message),
        }));
    }

    let lighthouse = response
        .lighthouse_result
        .as_ref()
        .ok_or_else(|| AppError::Audit("Response contains no lighthouse result".to_string()))?;

    let numeric = |name: &str| {
        lighthouse
            .audits
            .get(name)
            .and_then(|audit| audit.numeric_value)
    };

    Ok(PerformanceMetrics {
        performance_score: lighthouse
            .categories
            .performance
            .as_ref()
            .and_then(|c| c.score)
            .map(round_score),
        fcp_time: numeric(AUDIT_FCP).map(round_ms),
        lcp_time: numeric(AUDIT_LCP).map(round_ms),
        speed_index: numeric(AUDIT_SPEED_INDEX).map(round_ms),
        total_blocking_time: numeric(AUDIT_TBT).map(round_ms),
        cumulative_layout_shift: numeric(AUDIT_CLS).map(round_cls),
        load_time: numeric(AUDIT_INTERACTIVE).map(round_ms),
    })
}
