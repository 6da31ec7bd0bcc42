use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pv_config::{AppConfig, AuditorMode};
use pv_insight::InsightClient;
use pv_pagespeed::{FixtureAuditor, PageSpeedClient, PerformanceAuditor};
use pv_server::{build_router, AppState};
use pv_storage::Store;

#[derive(Parser, Debug)]
#[command(name = "pagevitals", about = "Website performance monitoring server")]
struct Cli {
    /// Override the bind port from PV_PORT / default.
    #[arg(long)]
    port: Option<u16>,

    /// Override the SQLite database path.
    #[arg(long)]
    database: Option<String>,

    /// Serve canned audits instead of calling the PageSpeed API.
    #[arg(long)]
    fixtures: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagevitals=info,pv_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if cli.fixtures {
        config.auditor_mode = AuditorMode::Fixture;
    }

    info!("Starting PageVitals...");
    info!(path = %config.database_path, "opening database");
    let store = Store::open(&config.database_path)?;

    let auditor: Arc<dyn PerformanceAuditor> = match config.auditor_mode {
        AuditorMode::Http => {
            if config.pagespeed_api_key.is_none() {
                info!("no PAGESPEED_API_KEY set, audits run unauthenticated");
            }
            Arc::new(PageSpeedClient::new(config.pagespeed_api_key.clone()))
        }
        AuditorMode::Fixture => {
            info!("fixture auditor selected, no PageSpeed calls will be made");
            Arc::new(FixtureAuditor::new())
        }
    };

    let insight = InsightClient::new(config.gemini_api_key.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store, auditor, insight);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
