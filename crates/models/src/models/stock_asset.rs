use std::fmt;

use serde::{Deserialize, Serialize};

/// Descriptor of a clip hosted by a third-party stock footage provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAssetReference {
    pub id: String,
    pub download_url: String,
    pub preview_url: Option<String>,
    /// Clip length in seconds.
    pub duration: f64,
    pub source: StockSource,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockSource {
    Pexels,
    Pixabay,
}

impl StockSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockSource::Pexels => "pexels",
            StockSource::Pixabay => "pixabay",
        }
    }
}

impl fmt::Display for StockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
