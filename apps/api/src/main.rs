mod assessment;
mod config;
mod db;
mod documents;
mod errors;
mod extract;
mod feedback;
mod form;
mod guidance;
mod interview;
mod llm_client;
mod models;
mod pipeline;
mod profiles;
mod routes;
mod session;
mod speech;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::gemini::{self, GeminiClient};
use crate::llm_client::staging::TokioSleeper;
use crate::routes::build_router;
use crate::speech::{Transcriber, WhisperClient};
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pathfinder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let pool = create_pool(&config.database_url).await?;

    // One Gemini client serves both generation and the file API
    let gemini = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_base_url.clone(),
    )?);
    info!("Gemini client initialized (model: {})", gemini::MODEL);

    let transcriber: Option<Arc<dyn Transcriber>> = match &config.openai_api_key {
        Some(key) => {
            let client = WhisperClient::new(key.clone(), config.openai_base_url.clone())?;
            info!("Transcription enabled");
            Some(Arc::new(client))
        }
        None => {
            warn!("OPENAI_API_KEY not set; transcription will answer 503");
            None
        }
    };

    let state = AppState {
        store: Arc::new(PgStore::new(pool.clone())),
        llm: gemini.clone(),
        files: gemini,
        sleeper: Arc::new(TokioSleeper),
        transcriber,
        poll_policy: config.poll_policy,
    };

    // Dropping a timed-out request future cancels its model call and file polling
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the web app's origin once it is configurable

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
