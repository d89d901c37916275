mod analysis;
mod config;
mod errors;
mod extract;
mod llm_client;
mod routes;
mod scrape;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{AwsSettings, BedrockGenerator};
use crate::routes::build_router;
use crate::scrape::JobFetcher;
use crate::session::store::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Job Matcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Bedrock client from the configured region and profile
    let llm = BedrockGenerator::connect(
        AwsSettings {
            region: config.aws_region.clone(),
            profile: config.aws_profile.clone(),
        },
        config.model_id.clone(),
    )
    .await;

    let fetcher = JobFetcher::new().context("Failed to build HTTP client")?;

    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        fetcher,
        sessions: SessionStore::new(chrono::Duration::minutes(config.session_idle_minutes)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
