mod analysis;
mod config;
mod document;
mod errors;
mod llm_client;
mod routes;
mod scraping;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scraping::{ApifyClient, JobOrchestrator, PollPolicy};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize scraping client and orchestrator
    let scraper = ApifyClient::new(
        config.apify_api_token.clone(),
        config.apify_base_url.clone(),
    );
    let policy = PollPolicy {
        interval: config.poll_interval(),
        max_polls: config.max_polls,
    };
    info!(
        "Scraper client initialized ({}, poll every {:?}, at most {} checks)",
        config.apify_base_url, policy.interval, policy.max_polls
    );
    let orchestrator =
        JobOrchestrator::new(Arc::new(scraper), policy, config.default_location.clone());

    // Build app state
    let state = AppState {
        analyzer: Arc::new(llm),
        orchestrator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
