use std::collections::{HashMap, HashSet};

use chrono::Utc;
use reelforge_models::wire::{BatchVideo, DownloadBatchRequest};
use reelforge_models::{FailureKind, StockAssetReference};
use tracing::{info, warn};

use super::classify::{infer_source, is_stock_url};
use super::retrieval::{ProgressFn, StockRetrievalService, report};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStatus {
    /// `count` provider URLs went out in the batch. Entries the backend
    /// could not save stay mapped to themselves.
    Migrated { count: usize },
    NothingToMigrate,
    BackendUnavailable { kind: FailureKind },
    Failed { kind: FailureKind, message: String },
}

/// Outcome of a batch migration. Unless nothing needed migrating,
/// `url_map` has an entry for every input URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub url_map: HashMap<String, String>,
    pub status: MigrationStatus,
}

impl MigrationReport {
    /// New URL for `url`, or `url` itself when it was left alone.
    pub fn resolve<'a>(&'a self, url: &'a str) -> &'a str {
        self.url_map.get(url).map_or(url, String::as_str)
    }
}

impl StockRetrievalService {
    /// Moves every provider-hosted URL in `urls` to local storage in one
    /// batch. All-or-nothing: any failure maps every input to itself.
    pub async fn migrate<S>(
        &self,
        urls: &[S],
        owner_id: &str,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> MigrationReport
    where
        S: AsRef<str> + Sync,
    {
        let urls: Vec<&str> = urls.iter().map(AsRef::as_ref).collect();

        if let Err(error) = self.backend.health().await {
            warn!(%error, count = urls.len(), "Backend unavailable, skipping migration");
            return MigrationReport {
                url_map: identity_map(&urls),
                status: MigrationStatus::BackendUnavailable { kind: error.kind() },
            };
        }

        let external = external_urls(&urls);
        if external.is_empty() {
            return MigrationReport {
                url_map: HashMap::new(),
                status: MigrationStatus::NothingToMigrate,
            };
        }

        let request = build_batch(&external, owner_id, Utc::now().timestamp_millis());
        match self.backend.save_batch(&request).await {
            Ok(saved) => {
                let mut url_map = saved;
                for url in &urls {
                    url_map
                        .entry((*url).to_string())
                        .or_insert_with(|| (*url).to_string());
                }
                report(on_progress, external.len(), external.len());
                info!(count = external.len(), owner_id, "Stock videos migrated");
                MigrationReport {
                    url_map,
                    status: MigrationStatus::Migrated {
                        count: external.len(),
                    },
                }
            }
            Err(error) => {
                warn!(%error, count = external.len(), "Batch migration failed");
                MigrationReport {
                    url_map: identity_map(&urls),
                    status: MigrationStatus::Failed {
                        kind: error.kind(),
                        message: error.message(),
                    },
                }
            }
        }
    }

    pub async fn migrate_references(
        &self,
        references: &[StockAssetReference],
        owner_id: &str,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> MigrationReport {
        let urls: Vec<&str> = references.iter().map(|r| r.download_url.as_str()).collect();
        self.migrate(urls.as_slice(), owner_id, on_progress).await
    }
}

fn identity_map(urls: &[&str]) -> HashMap<String, String> {
    urls.iter()
        .map(|url| ((*url).to_string(), (*url).to_string()))
        .collect()
}

/// Provider-hosted URLs in input order, without duplicates.
fn external_urls<'a>(urls: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    urls.iter()
        .copied()
        .filter(|url| is_stock_url(url) && seen.insert(*url))
        .collect()
}

fn build_batch(external: &[&str], owner_id: &str, now_millis: i64) -> DownloadBatchRequest {
    let videos = external
        .iter()
        .enumerate()
        .map(|(index, url)| BatchVideo {
            url: (*url).to_string(),
            source: infer_source(url),
            video_id: format!("stock_{index}_{now_millis}"),
        })
        .collect();

    DownloadBatchRequest {
        videos,
        project_id: owner_id.to_string(),
    }
}
