use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::Value;
use tokio::net::TcpListener;

/// Canned answers for each backend endpoint.
#[derive(Clone)]
pub struct StubResponses {
    pub health: StatusCode,
    /// How long the health route stalls before answering.
    pub health_delay: Duration,
    pub save: (StatusCode, Value),
    pub batch: (StatusCode, Value),
}

impl Default for StubResponses {
    fn default() -> Self {
        Self {
            health: StatusCode::OK,
            health_delay: Duration::ZERO,
            save: (StatusCode::OK, serde_json::json!({ "localUrl": "/media/p/x.mp4" })),
            batch: (StatusCode::OK, serde_json::json!({ "urlMap": {} })),
        }
    }
}

#[derive(Clone)]
struct StubState {
    responses: StubResponses,
    save_calls: Arc<AtomicUsize>,
    batch_calls: Arc<AtomicUsize>,
}

/// Scripted persistence backend for exercising client failure paths.
pub struct StubBackend {
    pub base_url: String,
    save_calls: Arc<AtomicUsize>,
    batch_calls: Arc<AtomicUsize>,
}

impl StubBackend {
    pub async fn spawn(responses: StubResponses) -> Self {
        let save_calls = Arc::new(AtomicUsize::new(0));
        let batch_calls = Arc::new(AtomicUsize::new(0));
        let state = StubState {
            responses,
            save_calls: Arc::clone(&save_calls),
            batch_calls: Arc::clone(&batch_calls),
        };

        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/download-stock-video", post(save))
            .route("/api/download-batch", post(batch))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            save_calls,
            batch_calls,
        }
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

async fn health(State(state): State<StubState>) -> StatusCode {
    tokio::time::sleep(state.responses.health_delay).await;
    state.responses.health
}

async fn save(State(state): State<StubState>) -> (StatusCode, Json<Value>) {
    state.save_calls.fetch_add(1, Ordering::SeqCst);
    let (status, body) = state.responses.save;
    (status, Json(body))
}

async fn batch(State(state): State<StubState>) -> (StatusCode, Json<Value>) {
    state.batch_calls.fetch_add(1, Ordering::SeqCst);
    let (status, body) = state.responses.batch;
    (status, Json(body))
}
