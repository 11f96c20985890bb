pub mod http;

use std::collections::HashMap;

use async_trait::async_trait;
use reelforge_models::FailureKind;
use reelforge_models::wire::{DownloadBatchRequest, DownloadStockVideoRequest};
use thiserror::Error;
use tracing::debug;

pub use http::HttpBackend;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Backend request timed out")]
    Timeout,
    #[error("Backend unreachable: {0}")]
    Connection(String),
    #[error("Backend returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Backend rejected request: {0}")]
    Rejected(String),
    #[error("Malformed backend response: {0}")]
    Malformed(String),
    #[error("Backend request failed: {0}")]
    Request(String),
}

impl BackendError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BackendError::Timeout => FailureKind::Timeout,
            BackendError::Connection(_) => FailureKind::Connection,
            BackendError::Http { status, .. } => FailureKind::Http { status: *status },
            BackendError::Rejected(_) => FailureKind::Rejected,
            BackendError::Malformed(_) => FailureKind::MalformedResponse,
            BackendError::Request(_) => FailureKind::Request,
        }
    }

    /// Message suitable for showing to the user.
    pub fn message(&self) -> String {
        match self {
            BackendError::Http { message, .. } | BackendError::Rejected(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_connect() {
            BackendError::Connection(err.to_string())
        } else if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else {
            BackendError::Request(err.to_string())
        }
    }
}

/// The local service that persists remote media into owned storage.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Liveness check. `Ok` only on a 2xx answer.
    async fn health(&self) -> Result<(), BackendError>;

    /// Persists one remote video, returning its local URL.
    async fn save_stock_video(
        &self,
        request: &DownloadStockVideoRequest,
    ) -> Result<String, BackendError>;

    /// Persists a set of remote videos, returning old URL → local URL for
    /// the ones the backend saved.
    async fn save_batch(
        &self,
        request: &DownloadBatchRequest,
    ) -> Result<HashMap<String, String>, BackendError>;

    async fn is_available(&self) -> bool {
        match self.health().await {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "Persistence backend unavailable");
                false
            }
        }
    }
}
