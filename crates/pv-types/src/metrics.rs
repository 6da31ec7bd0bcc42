//! Performance metric types
//!
//! Inside the fetcher every metric is an `Option`: `None` means the audit did
//! not report that metric. The absence-to-zero mapping happens only at the
//! storage boundary, never here.

use serde::{Deserialize, Serialize};

/// Metrics extracted from one completed performance audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Composite 0-100 score (the upstream 0-1 score scaled and rounded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<u8>,

    /// First Contentful Paint, whole milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcp_time: Option<u64>,

    /// Largest Contentful Paint, whole milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcp_time: Option<u64>,

    /// Speed Index, whole milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_index: Option<u64>,

    /// Total Blocking Time, whole milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_blocking_time: Option<u64>,

    /// Cumulative Layout Shift, rounded to 3 decimal places.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_layout_shift: Option<f64>,

    /// Overall observed load time, whole milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_time: Option<u64>,
}

impl PerformanceMetrics {
    /// A record with every metric unavailable.
    pub fn unavailable() -> Self {
        Self {
            performance_score: None,
            fcp_time: None,
            lcp_time: None,
            speed_index: None,
            total_blocking_time: None,
            cumulative_layout_shift: None,
            load_time: None,
        }
    }
}
