use reelforge_models::StockSource;

/// Host fragments that mark a URL as hosted by a stock provider.
pub const STOCK_HOSTS: [&str; 4] = [
    "pexels.com",
    "pixabay.com",
    "videos.pexels.com",
    "cdn.pixabay.com",
];

pub fn is_stock_url(url: &str) -> bool {
    STOCK_HOSTS.iter().any(|host| url.contains(host))
}

/// Provider a stock URL most likely belongs to. Anything that does not
/// look like Pexels is attributed to Pixabay.
pub fn infer_source(url: &str) -> StockSource {
    if url.contains("pexels") {
        StockSource::Pexels
    } else {
        StockSource::Pixabay
    }
}
