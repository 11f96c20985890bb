//! Command-line client for the persistence backend: availability checks,
//! single stock video retrieval and batch migration of stored URLs.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reelforge_config::Settings;
use reelforge_models::{RetrievalOutcome, StockAssetReference, StockSource};
use reelforge_services::stock::{MigrationStatus, Progress};
use reelforge_services::{HttpBackend, StockRetrievalService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelforge")]
#[command(about = "Move stock footage into local storage")]
#[command(version)]
struct Args {
    /// Backend base URL, overrides configuration
    #[arg(long, env = "REELFORGE__BACKEND__BASE_URL")]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exit 0 when the backend answers its health check
    Health,
    /// Save one stock video locally
    Retrieve {
        #[arg(long)]
        id: String,
        #[arg(long)]
        url: String,
        #[arg(long, value_parser = parse_source)]
        source: StockSource,
        #[arg(long)]
        project: String,
    },
    /// Migrate a list of URLs, printing the old -> new mapping as JSON
    Migrate {
        #[arg(long)]
        project: String,
        urls: Vec<String>,
    },
}

fn parse_source(raw: &str) -> Result<StockSource, String> {
    match raw {
        "pexels" => Ok(StockSource::Pexels),
        "pixabay" => Ok(StockSource::Pixabay),
        other => Err(format!("unknown source {other:?}, expected pexels or pixabay")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = Settings::load().context("loading settings")?;
    if let Some(url) = args.backend_url {
        settings.backend.base_url = url;
    }
    info!(backend = %settings.backend.base_url, "Using persistence backend");

    let backend = HttpBackend::new(&settings.backend)?;
    let service = StockRetrievalService::new(Arc::new(backend));

    match args.command {
        Command::Health => {
            if service.is_available().await {
                println!("available");
            } else {
                println!("unavailable");
                std::process::exit(1);
            }
        }
        Command::Retrieve {
            id,
            url,
            source,
            project,
        } => {
            let reference = StockAssetReference {
                id,
                download_url: url,
                preview_url: None,
                duration: 0.0,
                source,
                author: None,
            };
            let outcome = service.retrieve_and_save(&reference, &project, None).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let RetrievalOutcome::Failure { .. } = outcome {
                std::process::exit(2);
            }
        }
        Command::Migrate { project, urls } => {
            let on_progress = |p: Progress| eprintln!("migrated {}/{}", p.completed, p.total);
            let report = service.migrate(urls.as_slice(), &project, Some(&on_progress)).await;
            println!("{}", serde_json::to_string_pretty(&report.url_map)?);
            match report.status {
                MigrationStatus::Failed { message, .. } => {
                    eprintln!("migration failed: {message}");
                    std::process::exit(2);
                }
                MigrationStatus::BackendUnavailable { .. } => {
                    eprintln!("backend unavailable, URLs left unchanged");
                }
                MigrationStatus::Migrated { .. } | MigrationStatus::NothingToMigrate => {}
            }
        }
    }

    Ok(())
}
