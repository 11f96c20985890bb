use reelforge_config::Settings;
use reelforge_services::{StockDownloadService, TaskRegistry};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub tasks: Arc<TaskRegistry>,
    pub downloads: Arc<StockDownloadService>,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.backend.request_timeout())
            .build()?;
        let downloads = Arc::new(StockDownloadService::new(client, &settings.storage));
        let tasks = Arc::new(TaskRegistry::new());

        Ok(Self {
            settings,
            tasks,
            downloads,
        })
    }
}
