//! Persisted entity shapes
//!
//! These mirror the datastore tables. Analysis and quick-test rows are
//! insert-only: once written they are never updated, only deleted on user
//! request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A URL under recurring observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoredTarget {
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub show_on_dashboard: bool,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
}

/// One completed measurement of a monitored target.
///
/// Metric fields are plain numbers here: the storage boundary maps a metric
/// the audit did not report to `0` (a deliberate, documented product choice).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub url_id: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub performance_score: u8,
    pub fcp_time: u64,
    pub lcp_time: u64,
    pub speed_index: u64,
    pub total_blocking_time: u64,
    pub cumulative_layout_shift: f64,
    pub load_time: u64,
}

/// An ad-hoc measurement keyed by the tested URL rather than a target id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickTestRecord {
    pub id: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub performance_score: u8,
    pub fcp_time: u64,
    pub lcp_time: u64,
    pub speed_index: u64,
    pub total_blocking_time: u64,
    pub cumulative_layout_shift: f64,
    pub load_time: u64,
}

/// One request outcome, kept for the operational dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub url: String,
    pub outcome: String,
    pub latency_ms: u64,
}

impl RequestLogEntry {
    pub fn success(endpoint: impl Into<String>, url: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            endpoint: endpoint.into(),
            url: url.into(),
            outcome: "success".to_string(),
            latency_ms,
        }
    }

    pub fn error(
        endpoint: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            endpoint: endpoint.into(),
            url: url.into(),
            outcome: message.into(),
            latency_ms,
        }
    }
}
