//! End-to-end API tests over the assembled router

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use pv_config::AppConfig;
use pv_insight::InsightClient;
use pv_pagespeed::{FixtureAuditor, PerformanceAuditor};
use pv_server::{build_router, AppState};
use pv_storage::Store;
use pv_types::{AppError, AppResult, PerformanceMetrics};

/// Auditor that times out for every URL.
struct TimeoutAuditor;

#[async_trait]
impl PerformanceAuditor for TimeoutAuditor {
    async fn audit(&self, _url: &str) -> AppResult<PerformanceMetrics> {
        Err(AppError::AuditTimeout)
    }
}

/// Auditor that fails one specific URL and serves fixtures for the rest.
struct FailUrlAuditor {
    fail_url: String,
}

#[async_trait]
impl PerformanceAuditor for FailUrlAuditor {
    async fn audit(&self, url: &str) -> AppResult<PerformanceMetrics> {
        if url == self.fail_url {
            Err(AppError::Audit("upstream exploded".to_string()))
        } else {
            Ok(FixtureAuditor::metrics_for(url))
        }
    }
}

fn test_app(auditor: Arc<dyn PerformanceAuditor>) -> (Router, Store) {
    let store = Store::open_in_memory().unwrap();
    let state = AppState::new(
        AppConfig::default(),
        store.clone(),
        auditor,
        InsightClient::new(None),
    );
    (build_router(state), store)
}

async fn send(
    router: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    user_agent: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(ua) = user_agent {
        builder = builder.header(header::USER_AGENT, ua);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn quick_test_analysis_writes_one_quick_test_row() {
    let (router, store) = test_app(Arc::new(FixtureAuditor::new()));

    let (status, body) = send(
        &router,
        "POST",
        "/analyze",
        Some(json!({ "url": "https://example.com", "isQuickTest": true })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let metrics = &body["performance_metrics"];
    assert!(metrics["performance_score"].is_u64());
    assert!(metrics["fcp_time"].is_u64());
    assert!(metrics["lcp_time"].is_u64());
    assert!(metrics["speed_index"].is_u64());
    assert!(metrics["total_blocking_time"].is_u64());
    assert!(metrics["cumulative_layout_shift"].is_f64() || metrics["cumulative_layout_shift"].is_u64());
    assert!(body["analysis_time"].is_string());

    let quick_tests = store.list_quick_tests().unwrap();
    assert_eq!(quick_tests.len(), 1);
    assert_eq!(quick_tests[0].url, "https://example.com");
}

#[tokio::test]
async fn timed_out_analysis_reports_failure_and_writes_nothing() {
    let (router, store) = test_app(Arc::new(TimeoutAuditor));

    let (status, body) = send(
        &router,
        "POST",
        "/analyze",
        Some(json!({ "url": "https://slow.example", "isQuickTest": true })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("experiencing timeouts"));
    assert!(store.list_quick_tests().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_url_is_rejected_before_auditing() {
    let (router, _store) = test_app(Arc::new(FixtureAuditor::new()));

    for bad in ["", "example.com", "ftp://example.com"] {
        let (status, body) = send(
            &router,
            "POST",
            "/analyze",
            Some(json!({ "url": bad, "isQuickTest": true })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "url: {:?}", bad);
        assert_eq!(body["success"], json!(false));
    }
}

#[tokio::test]
async fn monitored_analysis_requires_known_target() {
    let (router, _store) = test_app(Arc::new(FixtureAuditor::new()));

    let (status, _) = send(
        &router,
        "POST",
        "/analyze",
        Some(json!({ "url": "https://example.com", "isQuickTest": false })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/analyze",
        Some(json!({
            "url": "https://example.com",
            "urlId": "no-such-target",
            "isQuickTest": false
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn repeated_analysis_appends_rows() {
    let (router, store) = test_app(Arc::new(FixtureAuditor::new()));
    let target = store
        .create_target("https://example.com", "Example", None)
        .unwrap();

    for _ in 0..2 {
        let (status, _) = send(
            &router,
            "POST",
            "/analyze",
            Some(json!({
                "url": "https://example.com",
                "urlId": target.id,
                "isQuickTest": false
            })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(store.list_analyses(&target.id).unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn sweep_continues_past_failed_target() {
    let fail_url = "https://two.example".to_string();
    let (router, store) = test_app(Arc::new(FailUrlAuditor {
        fail_url: fail_url.clone(),
    }));
    let one = store.create_target("https://one.example", "One", None).unwrap();
    let two = store.create_target(&fail_url, "Two", None).unwrap();
    let three = store
        .create_target("https://three.example", "Three", None)
        .unwrap();

    let (status, body) = send(&router, "POST", "/cron-sweep", None, Some("vercel-cron/1.0")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["successful"], json!(2));
    assert_eq!(body["failed"], json!(1));

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["url"], json!("https://one.example"));
    assert_eq!(results[1]["success"], json!(false));
    assert!(results[1]["error"].is_string());

    assert_eq!(store.list_analyses(&one.id).unwrap().len(), 1);
    assert!(store.list_analyses(&two.id).unwrap().is_empty());
    assert_eq!(store.list_analyses(&three.id).unwrap().len(), 1);
}

#[tokio::test]
async fn sweep_rejects_unknown_callers() {
    let (router, _store) = test_app(Arc::new(FixtureAuditor::new()));

    let (status, _) = send(&router, "POST", "/cron-sweep", None, Some("curl/8.0")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, "POST", "/cron-sweep", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &router,
        "POST",
        "/cron-sweep",
        None,
        Some("pagevitals-cron/1.0"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn insight_without_credential_is_a_config_error() {
    let (router, _store) = test_app(Arc::new(FixtureAuditor::new()));

    let (status, body) = send(
        &router,
        "POST",
        "/insight",
        Some(json!({ "prompt": "How are my sites doing?" })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn insight_requires_a_prompt() {
    let (router, _store) = test_app(Arc::new(FixtureAuditor::new()));

    let (status, _) = send(&router, "POST", "/insight", Some(json!({ "prompt": "" })), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn insight_falls_back_when_upstream_unreachable() {
    let store = Store::open_in_memory().unwrap();
    // Configured key but an unreachable endpoint: the request fails fast and
    // the deterministic sentence takes over.
    let insight = InsightClient::new(Some("test-key".to_string()))
        .with_base_url("http://127.0.0.1:9/unreachable");
    let state = AppState::new(
        AppConfig::default(),
        store.clone(),
        Arc::new(FixtureAuditor::new()),
        insight,
    );
    let router = build_router(state);

    let (status, body) = send(
        &router,
        "POST",
        "/insight",
        Some(json!({ "prompt": "Summarize my sites" })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["model"], json!("fallback"));
    assert!(body["insight"]
        .as_str()
        .unwrap()
        .contains("No performance data"));
}

#[tokio::test]
async fn screenshot_returns_png_data_uri() {
    let (router, _store) = test_app(Arc::new(FixtureAuditor::new()));

    let (status, body) = send(
        &router,
        "POST",
        "/screenshot",
        Some(json!({ "url": "https://example.com" })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["screenshot"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn target_crud_round_trip() {
    let (router, _store) = test_app(Arc::new(FixtureAuditor::new()));

    let (status, created) = send(
        &router,
        "POST",
        "/targets",
        Some(json!({ "url": "https://example.com", "name": "Example" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&router, "GET", "/targets", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&router, "DELETE", &format!("/targets/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, "DELETE", &format!("/targets/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_answers() {
    let (router, _store) = test_app(Arc::new(FixtureAuditor::new()));
    let (status, body) = send(&router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}
