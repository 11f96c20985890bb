use std::collections::HashMap;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use reelforge_config::StorageSettings;
use reelforge_models::wire::{DownloadBatchRequest, DownloadStockVideoRequest};
use thiserror::Error;
use tracing::{info, warn};

use super::classify::is_stock_url;
use super::filename::generate_filename;
use crate::storage::{MediaStore, PartialFile, StorageError};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Not a stock provider URL: {0}")]
    NotStockUrl(String),
    #[error("Failed to fetch video: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Provider returned {0}")]
    UpstreamStatus(u16),
    #[error("Video exceeds the {limit} byte download limit")]
    TooLarge { limit: u64 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Server side of the persistence backend: fetches provider files and
/// writes them into the media store.
pub struct StockDownloadService {
    client: reqwest::Client,
    store: MediaStore,
    public_path: String,
    restrict_to_stock_hosts: bool,
    max_concurrent: usize,
    max_bytes: u64,
}

impl StockDownloadService {
    pub fn new(client: reqwest::Client, settings: &StorageSettings) -> Self {
        Self {
            client,
            store: MediaStore::new(&settings.media_dir),
            public_path: settings.public_path.trim_end_matches('/').to_string(),
            restrict_to_stock_hosts: settings.restrict_to_stock_hosts,
            max_concurrent: settings.max_concurrent_downloads.max(1),
            max_bytes: settings.max_download_bytes,
        }
    }

    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    /// Downloads one video and returns the public URL it is served under.
    pub async fn download(&self, request: &DownloadStockVideoRequest) -> Result<String, DownloadError> {
        if self.restrict_to_stock_hosts && !is_stock_url(&request.url) {
            return Err(DownloadError::NotStockUrl(request.url.clone()));
        }

        let mut response = self.client.get(&request.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::UpstreamStatus(status.as_u16()));
        }
        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(DownloadError::TooLarge { limit: self.max_bytes });
        }

        let filename = generate_filename(
            request.source,
            &request.video_id,
            Utc::now().timestamp_millis(),
        );
        let mut file = self.store.create(&request.project_id, &filename).await?;
        if let Err(error) = self.copy_body(&mut response, &mut file).await {
            file.discard().await;
            return Err(error);
        }
        let size = file.written();
        file.commit().await?;

        let local_url = format!("{}/{}/{}", self.public_path, request.project_id, filename);
        info!(url = %request.url, %local_url, size, "Stock video downloaded");
        Ok(local_url)
    }

    async fn copy_body(
        &self,
        response: &mut reqwest::Response,
        file: &mut PartialFile,
    ) -> Result<(), DownloadError> {
        while let Some(chunk) = response.chunk().await? {
            if file.written() + chunk.len() as u64 > self.max_bytes {
                return Err(DownloadError::TooLarge { limit: self.max_bytes });
            }
            file.write(&chunk).await?;
        }
        Ok(())
    }

    /// Downloads every video in the batch with bounded concurrency.
    /// Failed entries are logged and left out of the returned map.
    pub async fn download_batch(&self, request: &DownloadBatchRequest) -> HashMap<String, String> {
        let total = request.videos.len();
        let singles: Vec<DownloadStockVideoRequest> = request
            .videos
            .iter()
            .map(|video| DownloadStockVideoRequest {
                url: video.url.clone(),
                source: video.source,
                video_id: video.video_id.clone(),
                project_id: request.project_id.clone(),
            })
            .collect();

        let results: Vec<_> = stream::iter(singles)
            .map(|single| async move {
                let result = self.download(&single).await;
                (single.url, result)
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut url_map = HashMap::with_capacity(total);
        for (url, result) in results {
            match result {
                Ok(local_url) => {
                    url_map.insert(url, local_url);
                }
                Err(error) => {
                    warn!(%url, %error, "Batch entry failed");
                }
            }
        }
        info!(saved = url_map.len(), total, "Batch download finished");
        url_map
    }
}
