use axum::{Router, extract::Path, http::StatusCode, routing::get};
use tokio::net::TcpListener;

pub const CLIP_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-clip";

/// Serves a fake clip for any path, or 404 for files named `missing*`.
///
/// Paths are chosen by tests to embed provider hostnames, e.g.
/// `/videos.pexels.com/1.mp4`, so the URLs classify as stock footage.
pub struct StockHost {
    pub base_url: String,
}

impl StockHost {
    pub async fn spawn() -> Self {
        let app = Router::new().route("/{*path}", get(serve_clip));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
        }
    }

    pub fn pexels(&self, name: &str) -> String {
        format!("{}/videos.pexels.com/{}", self.base_url, name)
    }

    pub fn pixabay(&self, name: &str) -> String {
        format!("{}/cdn.pixabay.com/{}", self.base_url, name)
    }
}

async fn serve_clip(Path(path): Path<String>) -> Result<&'static [u8], StatusCode> {
    if path.rsplit('/').next().is_some_and(|name| name.starts_with("missing")) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(CLIP_BYTES)
}
