//! Web server module for the account-activity webhook.
//!
//! This module provides:
//! - The CRC handshake endpoint that proves ownership of the consumer secret
//! - The push endpoint that replies to `#dadjoke` mentions
//! - Liveness endpoints

pub mod handlers;
pub mod signature;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, routing::get, BoxError, Router,
};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use handlers::{
    crc_challenge, health, root, webhook_event, AppState, CrcResponse, HealthResponse,
};
pub use signature::sign_crc_token;

/// Build the application router.
///
/// A request that outlives the server timeout is answered with a 400. Work
/// already handed to the reply pipeline keeps running in its own task.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server_timeout_secs);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhook/twitter", get(crc_challenge).post(webhook_event))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}

async fn handle_timeout(err: BoxError) -> (StatusCode, &'static str) {
    warn!(error = %err, "request_timed_out");
    (StatusCode::BAD_REQUEST, "request timed out")
}
