//! POST /insight
//!
//! Proxies the prompt to the text-generation API. A missing credential is a
//! configuration error (500, distinct message, no retry). Rate limits are
//! retried with backoff inside the client and surface as 429 once exhausted.
//! Any other upstream failure degrades to the deterministic rule-based
//! sentence rather than failing the request.

use axum::{extract::State, Json};
use tracing::warn;

use pv_insight::{fallback::fallback_insight, INSIGHT_MODEL};
use pv_types::AppError;

use crate::middleware::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;
use crate::types::{InsightRequest, InsightResponse};

pub async fn insight(
    State(state): State<AppState>,
    Json(request): Json<InsightRequest>,
) -> ApiResult<Json<InsightResponse>> {
    if request.prompt.trim().is_empty() {
        return Err(ApiErrorResponse::bad_request("prompt is required"));
    }
    if !state.insight.is_configured() {
        return Err(ApiErrorResponse::internal_error(
            "GEMINI_API_KEY is not configured",
        ));
    }

    match state.insight.summarize_with_retry(&request.prompt).await {
        Ok(text) => Ok(Json(InsightResponse {
            success: true,
            insight: text,
            model: INSIGHT_MODEL.to_string(),
        })),
        Err(AppError::RateLimitExceeded) => {
            Err(ApiErrorResponse::too_many_requests("Rate limit exceeded"))
        }
        Err(err) => {
            warn!("insight generation failed, using fallback: {}", err);
            // Read path degrades to "no data" rather than erroring twice.
            let average = state.store.average_performance_score().unwrap_or(None);
            Ok(Json(InsightResponse {
                success: true,
                insight: fallback_insight(average),
                model: "fallback".to_string(),
            }))
        }
    }
}
