use reelforge_models::StockSource;

/// `stock_{source}_{id}_{timestamp}.mp4`, with every non-alphanumeric
/// character removed from `video_id`.
pub fn generate_filename(source: StockSource, video_id: &str, timestamp_millis: i64) -> String {
    let sanitized: String = video_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("stock_{source}_{sanitized}_{timestamp_millis}.mp4")
}
