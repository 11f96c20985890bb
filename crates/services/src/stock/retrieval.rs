use std::sync::Arc;

use reelforge_models::wire::DownloadStockVideoRequest;
use reelforge_models::{RetrievalMode, RetrievalOutcome, StockAssetReference};
use tracing::{info, warn};

use crate::backend::PersistenceBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

/// Progress callback. May borrow from the caller for the duration of a call.
pub type ProgressFn<'a> = dyn Fn(Progress) + Send + Sync + 'a;

pub(crate) fn report(on_progress: Option<&ProgressFn<'_>>, completed: usize, total: usize) {
    if let Some(callback) = on_progress {
        callback(Progress { completed, total });
    }
}

/// Moves stock footage from provider hosting into local storage, falling
/// back to the provider URL when the backend is down.
pub struct StockRetrievalService {
    pub(crate) backend: Arc<dyn PersistenceBackend>,
}

impl StockRetrievalService {
    pub fn new(backend: Arc<dyn PersistenceBackend>) -> Self {
        Self { backend }
    }

    pub async fn is_available(&self) -> bool {
        self.backend.is_available().await
    }

    pub async fn retrieve_and_save(
        &self,
        reference: &StockAssetReference,
        owner_id: &str,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> RetrievalOutcome {
        if let Err(error) = self.backend.health().await {
            warn!(
                video_id = %reference.id,
                %error,
                "Backend unavailable, keeping remote stock URL"
            );
            return RetrievalOutcome::Success {
                local_url: reference.download_url.clone(),
                mode: RetrievalMode::Remote,
            };
        }

        let request = DownloadStockVideoRequest {
            url: reference.download_url.clone(),
            source: reference.source,
            video_id: reference.id.clone(),
            project_id: owner_id.to_string(),
        };

        report(on_progress, 0, 1);
        match self.backend.save_stock_video(&request).await {
            Ok(local_url) => {
                report(on_progress, 1, 1);
                info!(video_id = %reference.id, %local_url, "Stock video saved locally");
                RetrievalOutcome::Success {
                    local_url,
                    mode: RetrievalMode::Local,
                }
            }
            Err(error) => {
                warn!(video_id = %reference.id, %error, "Stock video save failed");
                RetrievalOutcome::Failure {
                    kind: error.kind(),
                    message: error.message(),
                }
            }
        }
    }
}
