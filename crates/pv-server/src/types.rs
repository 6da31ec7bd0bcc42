//! API request and response types

use serde::{Deserialize, Serialize};

use pv_types::{AnalysisRecord, QuickTestRecord};

// ==================== /analyze ====================

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,

    /// Target identifier; required unless this is a quick test.
    #[serde(rename = "urlId")]
    pub url_id: Option<String>,

    #[serde(rename = "isQuickTest", default)]
    pub is_quick_test: bool,
}

/// Metric block in the `/analyze` response. Values are the stored numbers,
/// so an unavailable metric shows up as `0` here, matching what the
/// dashboard will read back later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsPayload {
    pub performance_score: u8,
    pub fcp_time: u64,
    pub lcp_time: u64,
    pub speed_index: u64,
    pub total_blocking_time: u64,
    pub cumulative_layout_shift: f64,
}

impl From<&AnalysisRecord> for MetricsPayload {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            performance_score: record.performance_score,
            fcp_time: record.fcp_time,
            lcp_time: record.lcp_time,
            speed_index: record.speed_index,
            total_blocking_time: record.total_blocking_time,
            cumulative_layout_shift: record.cumulative_layout_shift,
        }
    }
}

impl From<&QuickTestRecord> for MetricsPayload {
    fn from(record: &QuickTestRecord) -> Self {
        Self {
            performance_score: record.performance_score,
            fcp_time: record.fcp_time,
            lcp_time: record.lcp_time,
            speed_index: record.speed_index,
            total_blocking_time: record.total_blocking_time,
            cumulative_layout_shift: record.cumulative_layout_shift,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub performance_metrics: MetricsPayload,
    /// RFC 3339 timestamp of the stored row.
    pub analysis_time: String,
}

// ==================== /cron-sweep ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepTargetResult {
    pub url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    pub success: bool,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<SweepTargetResult>,
}

// ==================== /insight ====================

#[derive(Debug, Clone, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    pub success: bool,
    pub insight: String,
    /// Model that produced the text, or "fallback" for the rule-based
    /// substitute.
    pub model: String,
}

// ==================== /screenshot ====================

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotRequest {
    pub url: String,

    #[serde(rename = "urlId")]
    pub url_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotResponse {
    pub success: bool,
    /// `data:image/png;base64,` URI of the placeholder image.
    pub screenshot: String,
}

// ==================== Targets ====================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTargetRequest {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
