//! POST /screenshot
//!
//! Returns the placeholder screenshot for a URL as a data URI. Not a real
//! page capture.

use axum::{extract::State, Json};

use super::helpers::validate_url;
use crate::middleware::error::ApiResult;
use crate::state::AppState;
use crate::types::{ScreenshotRequest, ScreenshotResponse};

pub async fn screenshot(
    State(_state): State<AppState>,
    Json(request): Json<ScreenshotRequest>,
) -> ApiResult<Json<ScreenshotResponse>> {
    validate_url(&request.url)?;

    let data_uri = pv_screenshot::screenshot_data_uri(&request.url)?;
    Ok(Json(ScreenshotResponse {
        success: true,
        screenshot: data_uri,
    }))
}
