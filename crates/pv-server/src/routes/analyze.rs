//! POST /analyze
//!
//! Runs one performance audit and persists exactly one new row. The flag in
//! the body picks the destination: quick tests are keyed by the raw URL,
//! monitor entries by their target id. A failed audit writes nothing.

use std::time::Instant;

use axum::{extract::State, Json};
use tracing::info;

use pv_types::RequestLogEntry;

use super::helpers::{log_outcome, validate_url};
use crate::middleware::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;
use crate::types::{AnalyzeRequest, AnalyzeResponse, MetricsPayload};

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    validate_url(&request.url)?;

    // Resolve the target up front: a bad id should fail before we spend
    // seconds auditing.
    let target_id = if request.is_quick_test {
        None
    } else {
        let id = request
            .url_id
            .ok_or_else(|| ApiErrorResponse::bad_request("urlId is required unless isQuickTest"))?;
        if state.store.get_target(&id)?.is_none() {
            return Err(ApiErrorResponse::bad_request(format!(
                "Unknown urlId: {}",
                id
            )));
        }
        Some(id)
    };

    let started = Instant::now();
    let metrics = match state.auditor.audit(&request.url).await {
        Ok(metrics) => metrics,
        Err(err) => {
            log_outcome(
                &state,
                RequestLogEntry::error(
                    "/analyze",
                    &request.url,
                    err.to_string(),
                    started.elapsed().as_millis() as u64,
                ),
            );
            return Err(err.into());
        }
    };

    // A "successful" analysis that fails to save must not be reported as
    // successful, so persistence errors propagate like any other.
    let (payload, analysis_time) = match &target_id {
        Some(id) => {
            let record = state.store.insert_analysis(id, &metrics)?;
            (MetricsPayload::from(&record), record.timestamp.to_rfc3339())
        }
        None => {
            let record = state.store.insert_quick_test(&request.url, &metrics)?;
            (MetricsPayload::from(&record), record.timestamp.to_rfc3339())
        }
    };

    let latency_ms = started.elapsed().as_millis() as u64;
    log_outcome(
        &state,
        RequestLogEntry::success("/analyze", &request.url, latency_ms),
    );
    info!(
        url = %request.url,
        quick_test = request.is_quick_test,
        score = payload.performance_score,
        latency_ms,
        "analysis stored"
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        performance_metrics: payload,
        analysis_time,
    }))
}
