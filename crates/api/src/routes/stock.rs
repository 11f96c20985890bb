use axum::{Json, extract::State, http::StatusCode};
use reelforge_models::wire::{
    DownloadBatchRequest, DownloadBatchResponse, DownloadStockVideoRequest,
    DownloadStockVideoResponse,
};
use reelforge_services::stock::DownloadError;
use reelforge_services::storage::StorageError;
use tracing::warn;

use crate::state::AppState;

fn status_for(error: &DownloadError) -> StatusCode {
    match error {
        DownloadError::NotStockUrl(_) => StatusCode::BAD_REQUEST,
        DownloadError::Storage(StorageError::InvalidProjectId(_)) => StatusCode::BAD_REQUEST,
        DownloadError::Fetch(_) | DownloadError::UpstreamStatus(_) => StatusCode::BAD_GATEWAY,
        DownloadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        DownloadError::Storage(StorageError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn download_stock_video(
    State(state): State<AppState>,
    Json(body): Json<DownloadStockVideoRequest>,
) -> (StatusCode, Json<DownloadStockVideoResponse>) {
    match state.downloads.download(&body).await {
        Ok(local_url) => (
            StatusCode::OK,
            Json(DownloadStockVideoResponse {
                local_url: Some(local_url),
                error: None,
            }),
        ),
        Err(error) => {
            warn!(url = %body.url, video_id = %body.video_id, %error, "Stock download failed");
            (
                status_for(&error),
                Json(DownloadStockVideoResponse {
                    local_url: None,
                    error: Some(error.to_string()),
                }),
            )
        }
    }
}

pub async fn download_batch(
    State(state): State<AppState>,
    Json(body): Json<DownloadBatchRequest>,
) -> (StatusCode, Json<DownloadBatchResponse>) {
    let url_map = state.downloads.download_batch(&body).await;

    if url_map.is_empty() && !body.videos.is_empty() {
        return (
            StatusCode::BAD_GATEWAY,
            Json(DownloadBatchResponse {
                url_map,
                error: Some("No video in the batch could be saved".to_string()),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(DownloadBatchResponse {
            url_map,
            error: None,
        }),
    )
}
