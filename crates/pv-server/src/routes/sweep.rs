//! POST /cron-sweep
//!
//! Batch audit of every monitored target, triggered by a scheduler. Targets
//! are processed strictly one at a time in display order with a fixed pause
//! between them so the upstream API is never hammered. A failed target never
//! aborts the sweep; the response reports per-target outcomes.

use std::time::Duration;

use axum::{extract::State, http::HeaderMap, Json};
use tracing::{info, warn};

use crate::middleware::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;
use crate::types::{SweepResponse, SweepTargetResult};

/// Pause between consecutive targets.
pub const SWEEP_DELAY: Duration = Duration::from_secs(2);

/// Only known automation identities may trigger a sweep.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiErrorResponse> {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if state
        .config
        .cron_identities
        .iter()
        .any(|identity| identity == user_agent)
    {
        Ok(())
    } else {
        Err(ApiErrorResponse::unauthorized(
            "Caller is not a recognized automation identity",
        ))
    }
}

pub async fn cron_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SweepResponse>> {
    authorize(&state, &headers)?;

    let targets = state.store.list_targets()?;
    info!(total = targets.len(), "cron sweep started");

    let mut results = Vec::with_capacity(targets.len());
    for (index, target) in targets.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(SWEEP_DELAY).await;
        }

        match state.auditor.audit(&target.url).await {
            Ok(metrics) => match state.store.insert_analysis(&target.id, &metrics) {
                Ok(_) => results.push(SweepTargetResult {
                    url: target.url.clone(),
                    success: true,
                    error: None,
                }),
                Err(err) => {
                    warn!(url = %target.url, "sweep persist failed: {}", err);
                    results.push(SweepTargetResult {
                        url: target.url.clone(),
                        success: false,
                        error: Some(err.to_string()),
                    });
                }
            },
            Err(err) => {
                warn!(url = %target.url, "sweep audit failed: {}", err);
                results.push(SweepTargetResult {
                    url: target.url.clone(),
                    success: false,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    let successful = results.iter().filter(|r| r.success).count();
    let failed = results.len() - successful;
    info!(successful, failed, "cron sweep finished");

    Ok(Json(SweepResponse {
        success: true,
        total: results.len(),
        successful,
        failed,
        results,
    }))
}
