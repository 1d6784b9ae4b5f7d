mod config;
mod errors;
mod llm_client;
mod pipeline;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LlmClient, LlmSettings};
use crate::pipeline::fetcher::HttpFetcher;
use crate::pipeline::Pipeline;
use crate::routes::build_router;
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

    info!("Starting coldmail API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(LlmSettings {
        base_url: config.llm_base_url.clone(),
        api_key: config.groq_api_key.clone(),
        model: config.llm_model.clone(),
        temperature: config.llm_temperature,
    })?;
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize page fetcher
    let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
    info!("Page fetcher initialized (timeout: {}s)", config.fetch_timeout_secs);

    let pipeline = Pipeline::new(Arc::new(fetcher), Arc::new(llm))
        .with_max_input_tokens(config.max_input_tokens);

    let state = AppState { pipeline };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser UI is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
