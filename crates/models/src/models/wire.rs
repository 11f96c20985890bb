//! JSON bodies exchanged with the local persistence backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::stock_asset::StockSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStockVideoRequest {
    pub url: String,
    pub source: StockSource,
    pub video_id: String,
    pub project_id: String,
}

/// Either `local_url` or `error` is set, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStockVideoResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchVideo {
    pub url: String,
    pub source: StockSource,
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBatchRequest {
    pub videos: Vec<BatchVideo>,
    pub project_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBatchResponse {
    #[serde(default)]
    pub url_map: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
