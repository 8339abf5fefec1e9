mod browser;
mod config;
mod errors;
mod generation;
mod llm_client;
mod resume;
mod routes;
mod state;
mod styles;
#[cfg(test)]
mod testing;
mod ui;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::{ChromeToolkit, DocumentSettings};
use crate::routes::build_router;
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

    info!("Starting Job Application Helper v{}", env!("CARGO_PKG_VERSION"));

    // Styles are re-read on every request; an empty directory is not fatal
    if !config.styles_dir.is_dir() {
        warn!(
            "Styles directory {} does not exist; the form will show no styles",
            config.styles_dir.display()
        );
    }
    info!(
        "LLM model: {}, browser timeout: {}s",
        config.llm_model, config.browser_timeout_secs
    );

    let state = AppState {
        settings: DocumentSettings::from_config(&config),
        toolkit: Arc::new(ChromeToolkit::from_config(&config)),
        config: config.clone(),
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
