//! Retry behavior against a local mock of the PageSpeed API
//!
//! These tests run on real time with the client's retry timing scaled down,
//! so the schedule is exercised without wall-clock waits and without racing
//! a virtual clock against live sockets.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use pv_pagespeed::{PageSpeedClient, PerformanceAuditor};
use pv_types::AppError;

async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Client pointed at the mock with milliseconds-scale retry timing.
fn fast_client(addr: SocketAddr) -> PageSpeedClient {
    PageSpeedClient::new(None)
        .with_base_url(format!("http://{}", addr))
        .with_timing(
            Duration::from_secs(2),
            Duration::from_secs(1),
            Duration::from_millis(20),
        )
}

fn good_audit_body() -> serde_json::Value {
    serde_json::json!({
        "lighthouseResult": {
            "categories": { "performance": { "score": 0.873 } },
            "audits": {
                "first-contentful-paint": { "numericValue": 1234.56 },
                "largest-contentful-paint": { "numericValue": 2499.4 },
                "speed-index": { "numericValue": 3100.5 },
                "total-blocking-time": { "numericValue": 89.9 },
                "cumulative-layout-shift": { "numericValue": 0.12345 },
                "interactive": { "numericValue": 5000.0 }
            }
        }
    })
}

#[tokio::test]
async fn recovers_after_transient_500s_within_three_attempts() {
    let hits = Arc::new(AtomicU32::new(0));
    let router = Router::new()
        .route(
            "/",
            get(|State(hits): State<Arc<AtomicU32>>| async move {
                let attempt = hits.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                } else {
                    Json(good_audit_body()).into_response()
                }
            }),
        )
        .with_state(hits.clone());
    let addr = spawn_server(router).await;

    let client = fast_client(addr);
    let metrics = client.audit("https://example.com").await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(metrics.performance_score, Some(87));
    assert_eq!(metrics.cumulative_layout_shift, Some(0.123));
}

#[tokio::test]
async fn no_request_after_success() {
    let hits = Arc::new(AtomicU32::new(0));
    let router = Router::new()
        .route(
            "/",
            get(|State(hits): State<Arc<AtomicU32>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(good_audit_body())
            }),
        )
        .with_state(hits.clone());
    let addr = spawn_server(router).await;

    let client = fast_client(addr);
    client.audit("https://example.com").await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn gives_up_after_three_attempts() {
    let hits = Arc::new(AtomicU32::new(0));
    let router = Router::new()
        .route(
            "/",
            get(|State(hits): State<Arc<AtomicU32>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                StatusCode::BAD_GATEWAY
            }),
        )
        .with_state(hits.clone());
    let addr = spawn_server(router).await;

    let client = fast_client(addr);
    let err = client.audit("https://example.com").await.unwrap_err();

    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn rate_limit_surfaces_as_distinct_error() {
    let router = Router::new().route("/", get(|| async { StatusCode::TOO_MANY_REQUESTS }));
    let addr = spawn_server(router).await;

    let client = fast_client(addr);
    let err = client.audit("https://example.com").await.unwrap_err();
    assert!(matches!(err, AppError::RateLimitExceeded));
}

#[tokio::test]
async fn slow_upstream_times_out_with_user_facing_message() {
    // The handler outlives every shrunken per-attempt timeout, so all three
    // attempts time out and the terminal error carries the user-facing text.
    let hits = Arc::new(AtomicU32::new(0));
    let router = Router::new()
        .route(
            "/",
            get(|State(hits): State<Arc<AtomicU32>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(good_audit_body())
            }),
        )
        .with_state(hits.clone());
    let addr = spawn_server(router).await;

    let client = PageSpeedClient::new(None)
        .with_base_url(format!("http://{}", addr))
        .with_timing(
            Duration::from_millis(60),
            Duration::from_millis(20),
            Duration::from_millis(10),
        );
    let err = client.audit("https://example.com").await.unwrap_err();

    assert!(matches!(err, AppError::AuditTimeout));
    assert!(err.to_string().contains("experiencing timeouts"));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn embedded_error_object_fails_the_attempt() {
    let router = Router::new().route(
        "/",
        get(|| async {
            Json(serde_json::json!({
                "error": { "message": "Lighthouse returned error: NO_FCP", "code": 500 }
            }))
        }),
    );
    let addr = spawn_server(router).await;

    let client = fast_client(addr);
    let err = client.audit("https://example.com").await.unwrap_err();
    assert!(err.to_string().contains("NO_FCP"));
}
