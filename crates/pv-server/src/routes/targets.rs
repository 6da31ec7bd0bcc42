//! Dashboard read/manage surface: targets, their histories, quick tests

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use pv_types::{AnalysisRecord, MonitoredTarget, QuickTestRecord};

use super::helpers::validate_url;
use crate::middleware::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;
use crate::types::CreateTargetRequest;

pub async fn list_targets(State(state): State<AppState>) -> ApiResult<Json<Vec<MonitoredTarget>>> {
    Ok(Json(state.store.list_targets()?))
}

pub async fn create_target(
    State(state): State<AppState>,
    Json(request): Json<CreateTargetRequest>,
) -> ApiResult<Json<MonitoredTarget>> {
    validate_url(&request.url)?;
    if request.name.trim().is_empty() {
        return Err(ApiErrorResponse::bad_request("name is required"));
    }

    let target = state.store.create_target(
        &request.url,
        request.name.trim(),
        request.description.as_deref(),
    )?;
    Ok(Json(target))
}

pub async fn delete_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if state.store.delete_target(&id)? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiErrorResponse::not_found(format!("Unknown target: {}", id)))
    }
}

pub async fn list_analyses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<AnalysisRecord>>> {
    Ok(Json(state.store.list_analyses(&id)?))
}

pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if state.store.delete_analysis(&id)? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiErrorResponse::not_found(format!(
            "Unknown analysis: {}",
            id
        )))
    }
}

pub async fn list_quick_tests(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<QuickTestRecord>>> {
    Ok(Json(state.store.list_quick_tests()?))
}

pub async fn delete_quick_test(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if state.store.delete_quick_test(&id)? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiErrorResponse::not_found(format!(
            "Unknown quick test: {}",
            id
        )))
    }
}
