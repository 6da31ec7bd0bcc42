//! Shared helper functions for route handlers

use axum::http::Uri;
use tracing::warn;

use pv_types::RequestLogEntry;

use crate::middleware::error::ApiErrorResponse;
use crate::state::AppState;

/// Validate that `raw` is a well-formed absolute http(s) URL.
///
/// Rejected input never reaches the auditor; this is the 400 class of the
/// error taxonomy.
pub fn validate_url(raw: &str) -> Result<(), ApiErrorResponse> {
    if raw.trim().is_empty() {
        return Err(ApiErrorResponse::bad_request("url is required"));
    }
    let uri: Uri = raw
        .parse()
        .map_err(|_| ApiErrorResponse::bad_request(format!("Invalid URL: {}", raw)))?;
    match uri.scheme_str() {
        Some("http") | Some("https") if uri.host().is_some() => Ok(()),
        _ => Err(ApiErrorResponse::bad_request(format!(
            "URL must be absolute http(s): {}",
            raw
        ))),
    }
}

/// Append a request outcome to the operational log. A logging failure is
/// worth a warning but never fails the request it describes.
pub fn log_outcome(state: &AppState, entry: RequestLogEntry) {
    if let Err(err) = state.store.log_request(&entry) {
        warn!("failed to write request log entry: {}", err);
    }
}
