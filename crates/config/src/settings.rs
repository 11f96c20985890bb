use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub backend: BackendSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// Where the local persistence backend lives, as seen by the retrieval client.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub health_timeout_ms: u64,
    pub request_timeout_secs: u64,
}

impl BackendSettings {
    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory downloaded media is written to, one subdirectory per project.
    pub media_dir: String,
    /// URL prefix the media directory is served under.
    pub public_path: String,
    pub restrict_to_stock_hosts: bool,
    pub max_concurrent_downloads: usize,
    /// Downloads larger than this are aborted and nothing is stored.
    pub max_download_bytes: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("REELFORGE"),
            )
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 3001)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("backend.base_url", "http://127.0.0.1:3001")?
            .set_default("backend.health_timeout_ms", 2000)?
            .set_default("backend.request_timeout_secs", 300)?
            .set_default("storage.media_dir", "media")?
            .set_default("storage.public_path", "/media")?
            .set_default("storage.restrict_to_stock_hosts", true)?
            .set_default("storage.max_concurrent_downloads", 4)?
            .set_default("storage.max_download_bytes", 524_288_000_i64)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
