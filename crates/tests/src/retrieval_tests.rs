use crate::fixtures::stock_host::{CLIP_BYTES, StockHost};
use crate::fixtures::stub_backend::{StubBackend, StubResponses};
use crate::fixtures::test_app::{TestApp, dead_backend_url, retrieval_for};
use axum::http::StatusCode;
use reelforge_models::{FailureKind, RetrievalMode, RetrievalOutcome, StockAssetReference, StockSource};
use serde_json::Value;

fn reference(id: &str, download_url: String) -> StockAssetReference {
    StockAssetReference {
        id: id.to_string(),
        download_url,
        preview_url: None,
        duration: 8.0,
        source: StockSource::Pexels,
        author: Some("Test Author".to_string()),
    }
}

#[tokio::test]
async fn retrieve_saves_local_copy() {
    let app = TestApp::spawn().await;
    let host = StockHost::spawn().await;
    let reference = reference("px-77!", host.pexels("77.mp4"));

    let outcome = app
        .retrieval()
        .retrieve_and_save(&reference, "project1", None)
        .await;

    let RetrievalOutcome::Success { local_url, mode } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(mode, RetrievalMode::Local);
    assert!(local_url.starts_with("/media/project1/stock_pexels_px77_"));
    assert!(local_url.ends_with(".mp4"));

    let filename = local_url.rsplit('/').next().unwrap();
    let stored = app.media_dir.path().join("project1").join(filename);
    assert_eq!(tokio::fs::read(&stored).await.unwrap(), CLIP_BYTES);

    // Saved files are served back under the public path
    let resp = app.client.get(app.url(&local_url)).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), CLIP_BYTES);
}

#[tokio::test]
async fn retrieve_degrades_to_remote_url_when_backend_down() {
    let url = dead_backend_url().await;
    let reference = reference("1", "https://videos.pexels.com/1.mp4".to_string());

    let outcome = retrieval_for(&url)
        .retrieve_and_save(&reference, "project1", None)
        .await;

    assert_eq!(
        outcome,
        RetrievalOutcome::Success {
            local_url: "https://videos.pexels.com/1.mp4".to_string(),
            mode: RetrievalMode::Remote,
        }
    );
}

#[tokio::test]
async fn missing_remote_file_surfaces_server_error() {
    let app = TestApp::spawn().await;
    let host = StockHost::spawn().await;
    let reference = reference("9", host.pexels("missing.mp4"));

    let outcome = app
        .retrieval()
        .retrieve_and_save(&reference, "project1", None)
        .await;

    assert_eq!(
        outcome,
        RetrievalOutcome::Failure {
            kind: FailureKind::Http { status: 502 },
            message: "Provider returned 404".to_string(),
        }
    );
}

#[tokio::test]
async fn server_error_without_message_uses_generic_text() {
    let stub = StubBackend::spawn(StubResponses {
        save: (StatusCode::INTERNAL_SERVER_ERROR, Value::Null),
        ..Default::default()
    })
    .await;
    let reference = reference("2", "https://cdn.pixabay.com/2.mp4".to_string());

    let outcome = retrieval_for(&stub.base_url)
        .retrieve_and_save(&reference, "project1", None)
        .await;

    assert_eq!(
        outcome,
        RetrievalOutcome::Failure {
            kind: FailureKind::Http { status: 500 },
            message: "Failed to save video".to_string(),
        }
    );
    assert_eq!(stub.save_calls(), 1);
}

#[tokio::test]
async fn non_stock_urls_are_refused_by_the_server() {
    let app = TestApp::spawn().await;
    let resp = app
        .client
        .post(app.url("/api/download-stock-video"))
        .json(&serde_json::json!({
            "url": "https://example.com/local.mp4",
            "source": "pexels",
            "videoId": "1",
            "projectId": "project1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().contains("example.com"));
}

#[tokio::test]
async fn invalid_project_id_is_refused() {
    let app = TestApp::spawn().await;
    let host = StockHost::spawn().await;
    let resp = app
        .client
        .post(app.url("/api/download-stock-video"))
        .json(&serde_json::json!({
            "url": host.pexels("3.mp4"),
            "source": "pexels",
            "videoId": "3",
            "projectId": "../escape",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn oversized_video_is_refused_and_not_stored() {
    let app = TestApp::spawn_with_settings(|settings| {
        settings.storage.max_download_bytes = 4;
    })
    .await;
    let host = StockHost::spawn().await;
    let resp = app
        .client
        .post(app.url("/api/download-stock-video"))
        .json(&serde_json::json!({
            "url": host.pexels("big.mp4"),
            "source": "pexels",
            "videoId": "4",
            "projectId": "project1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 413);
    let json: Value = resp.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().contains("download limit"));

    let project_dir = app.media_dir.path().join("project1");
    let stored = std::fs::read_dir(&project_dir).map_or(0, |entries| entries.count());
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn concurrent_saves_of_one_video_both_succeed() {
    let app = TestApp::spawn().await;
    let host = StockHost::spawn().await;
    let retrieval = app.retrieval();
    let clip = reference("same-id", host.pexels("5.mp4"));

    let (first, second) = tokio::join!(
        retrieval.retrieve_and_save(&clip, "project1", None),
        retrieval.retrieve_and_save(&clip, "project1", None),
    );

    for outcome in [first, second] {
        let local_url = outcome.local_url().unwrap().to_string();
        let filename = local_url.rsplit('/').next().unwrap();
        let stored = app.media_dir.path().join("project1").join(filename);
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), CLIP_BYTES);
    }
    let leftovers = std::fs::read_dir(app.media_dir.path().join("project1"))
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .is_ok_and(|e| e.file_name().to_string_lossy().ends_with(".part"))
        })
        .count();
    assert_eq!(leftovers, 0);
}
