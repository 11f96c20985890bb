pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    // Generation task routes
    let task_routes = Router::new()
        .route("/", get(routes::task::list).post(routes::task::create))
        .route("/asset/{asset_id}", get(routes::task::by_asset))
        .route("/{task_id}", get(routes::task::get).patch(routes::task::update))
        .route("/{task_id}/cancel", post(routes::task::cancel));

    // Compose API
    let api = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/download-stock-video", post(routes::stock::download_stock_video))
        .route("/download-batch", post(routes::stock::download_batch))
        .route("/workflow/stages", get(routes::task::stages))
        .nest("/task", task_routes);

    let media = ServeDir::new(&state.settings.storage.media_dir);

    Router::new()
        .nest("/api", api)
        .nest_service(&state.settings.storage.public_path, media)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
