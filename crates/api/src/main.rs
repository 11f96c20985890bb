use std::time::Duration;

use reelforge_api::{build_router, state::AppState};
use reelforge_config::Settings;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Finished tasks are dropped from memory after this long.
const FINISHED_TASK_TTL_HOURS: i64 = 24;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "reelforge_api=debug,reelforge_services=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let settings = Settings::load()?;
    info!("Starting Reelforge API on {}:{}", settings.app.host, settings.app.port);
    info!(
        media_dir = %settings.storage.media_dir,
        public_path = %settings.storage.public_path,
        restrict_to_stock_hosts = settings.storage.restrict_to_stock_hosts,
        "Media storage config"
    );

    tokio::fs::create_dir_all(&settings.storage.media_dir).await?;

    let app_state = AppState::new(settings.clone())?;

    // Periodically forget finished tasks
    let tasks = app_state.tasks.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            tasks.prune_finished(chrono::Duration::hours(FINISHED_TASK_TTL_HOURS));
        }
    });

    let app = build_router(app_state);

    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
