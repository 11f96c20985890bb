//! HTTP client for the local persistence backend.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reelforge_config::BackendSettings;
use reelforge_models::wire::{
    DownloadBatchRequest, DownloadBatchResponse, DownloadStockVideoRequest,
    DownloadStockVideoResponse,
};
use serde::de::DeserializeOwned;

use super::{BackendError, PersistenceBackend};

const GENERIC_SAVE_ERROR: &str = "Failed to save video";

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self::with_client(
            client,
            settings.base_url.clone(),
            settings.health_timeout(),
        ))
    }

    /// Reuses an existing client (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: String, health_timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads the body once and decodes it; on a non-2xx status the
    /// body's `error` field, when present, becomes the message.
    async fn read_json<T>(
        response: reqwest::Response,
        error_of: impl Fn(&T) -> Option<String>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<T>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .as_ref()
                .and_then(&error_of)
                .unwrap_or_else(|| GENERIC_SAVE_ERROR.to_string());
            return Err(BackendError::Http {
                status: status.as_u16(),
                message,
            });
        }

        parsed.map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl PersistenceBackend for HttpBackend {
    async fn health(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.url("/api/health"))
            .timeout(self.health_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Http {
                status: status.as_u16(),
                message: format!("health check returned {status}"),
            })
        }
    }

    async fn save_stock_video(
        &self,
        request: &DownloadStockVideoRequest,
    ) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.url("/api/download-stock-video"))
            .json(request)
            .send()
            .await?;

        let body: DownloadStockVideoResponse =
            Self::read_json(response, |b: &DownloadStockVideoResponse| b.error.clone()).await?;

        match (body.local_url, body.error) {
            (Some(local_url), _) => Ok(local_url),
            (None, Some(error)) => Err(BackendError::Rejected(error)),
            (None, None) => Err(BackendError::Malformed("missing localUrl".to_string())),
        }
    }

    async fn save_batch(
        &self,
        request: &DownloadBatchRequest,
    ) -> Result<HashMap<String, String>, BackendError> {
        let response = self
            .client
            .post(self.url("/api/download-batch"))
            .json(request)
            .send()
            .await?;

        let body: DownloadBatchResponse =
            Self::read_json(response, |b: &DownloadBatchResponse| b.error.clone()).await?;

        match body.error {
            Some(error) if body.url_map.is_empty() => Err(BackendError::Rejected(error)),
            _ => Ok(body.url_map),
        }
    }
}
