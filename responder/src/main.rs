//! Mention Responder web server.
//!
//! Answers CRC handshakes and replies to `#dadjoke` mentions pushed by the
//! account activity webhook.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use responder::clients::build_http_client;
use responder::{
    build_router, AppState, Config, DadJokeClient, OAuthSigner, TriggerMatcher, TwitterClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be populated.
    dotenvy::dotenv().ok();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        twitter_base_url = %config.twitter_base_url,
        dadjoke_api_url = %config.dadjoke_api_url,
        request_timeout_ms = config.request_timeout_ms,
        server_timeout_secs = config.server_timeout_secs,
        "config_loaded"
    );

    let http = build_http_client(&config).context("Failed to build HTTP client")?;

    let content = DadJokeClient::new(http.clone(), config.dadjoke_api_url.clone());
    let dispatcher = TwitterClient::new(
        http,
        &config.twitter_base_url,
        OAuthSigner::new(config.credentials.clone()),
    );
    let triggers = TriggerMatcher::with_default_rules().context("Invalid trigger pattern")?;

    let port = config.port;
    let state = AppState::new(config, Arc::new(content), Arc::new(dispatcher), triggers);
    let app = build_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
