use crate::fixtures::stub_backend::{StubBackend, StubResponses};
use crate::fixtures::test_app::{TestApp, dead_backend_url, retrieval_for};
use axum::http::StatusCode;
use reelforge_models::{FailureKind, StockSource};
use reelforge_models::wire::DownloadStockVideoRequest;
use reelforge_services::{BackendError, HttpBackend, PersistenceBackend};
use std::time::Duration;

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::with_client(
        reqwest::Client::new(),
        base_url.to_string(),
        Duration::from_millis(500),
    )
}

fn save_request() -> DownloadStockVideoRequest {
    DownloadStockVideoRequest {
        url: "https://videos.pexels.com/1.mp4".to_string(),
        source: StockSource::Pexels,
        video_id: "1".to_string(),
        project_id: "proj".to_string(),
    }
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = TestApp::spawn().await;
    let (status, json) = app.get_json("/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn running_backend_is_available() {
    let app = TestApp::spawn().await;
    assert!(app.retrieval().is_available().await);
    tokio_test::assert_ok!(backend(&app.base_url).health().await);
}

#[tokio::test]
async fn nothing_listening_is_unavailable() {
    let url = dead_backend_url().await;
    assert!(!retrieval_for(&url).is_available().await);

    let err = backend(&url).health().await.unwrap_err();
    assert!(matches!(err, BackendError::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn non_success_health_is_unavailable() {
    let stub = StubBackend::spawn(StubResponses {
        health: StatusCode::SERVICE_UNAVAILABLE,
        ..Default::default()
    })
    .await;
    assert!(!retrieval_for(&stub.base_url).is_available().await);

    let err = backend(&stub.base_url).health().await.unwrap_err();
    assert!(matches!(err, BackendError::Http { status: 503, .. }));
}

#[tokio::test]
async fn slow_health_check_times_out() {
    let stub = StubBackend::spawn(StubResponses {
        health_delay: Duration::from_secs(5),
        ..Default::default()
    })
    .await;

    let started = std::time::Instant::now();
    assert!(!retrieval_for(&stub.base_url).is_available().await);
    assert!(started.elapsed() < Duration::from_secs(3));

    let err = backend(&stub.base_url).health().await.unwrap_err();
    assert_eq!(err, BackendError::Timeout);
    assert_eq!(err.kind(), FailureKind::Timeout);
}

#[tokio::test]
async fn save_without_local_url_is_malformed() -> anyhow::Result<()> {
    let stub = StubBackend::spawn(StubResponses {
        save: (StatusCode::OK, serde_json::json!({ "unexpected": true })),
        ..Default::default()
    })
    .await;

    let err = backend(&stub.base_url)
        .save_stock_video(&save_request())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Malformed(_)));
    assert_eq!(stub.save_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn save_error_body_is_reported() -> anyhow::Result<()> {
    let stub = StubBackend::spawn(StubResponses {
        save: (
            StatusCode::BAD_GATEWAY,
            serde_json::json!({ "error": "Provider returned 404" }),
        ),
        ..Default::default()
    })
    .await;

    let err = backend(&stub.base_url)
        .save_stock_video(&save_request())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Http {
            status: 502,
            message: "Provider returned 404".to_string(),
        }
    );
    Ok(())
}
