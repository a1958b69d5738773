//! Webhook endpoint handlers.
//!
//! - `GET /webhook/twitter` answers the CRC handshake
//! - `POST /webhook/twitter` receives account-activity pushes
//!
//! Every failure is answered with a 400 and a fixed diagnostic; secrets and
//! upstream error details only go to the logs.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::clients::{ContentProvider, ReplyDispatcher};
use crate::error::{Classify, ErrorClass};
use crate::event::{extract_mention, ExtractError, TriggerDecision, TriggerMatcher};
use crate::pipeline::{respond_with_joke, PipelineError};
use crate::web::signature::sign_crc_token;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub content: Arc<dyn ContentProvider>,
    pub dispatcher: Arc<dyn ReplyDispatcher>,
    pub triggers: Arc<TriggerMatcher>,
}

impl AppState {
    pub fn new(
        config: Config,
        content: Arc<dyn ContentProvider>,
        dispatcher: Arc<dyn ReplyDispatcher>,
        triggers: TriggerMatcher,
    ) -> Self {
        Self {
            config: Arc::new(config),
            content,
            dispatcher,
            triggers: Arc::new(triggers),
        }
    }
}

// =============================================================================
// Liveness
// =============================================================================

/// Root endpoint.
pub async fn root() -> &'static str {
    "server up and running!"
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// CRC Handshake
// =============================================================================

/// CRC handshake response body.
#[derive(Debug, Serialize)]
pub struct CrcResponse {
    pub response_token: String,
}

/// CRC challenge endpoint.
///
/// The query is taken as raw pairs so a repeated `crc_token` uses the first
/// value instead of being rejected.
pub async fn crc_challenge(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let challenge = params
        .iter()
        .find(|(key, _)| key == "crc_token")
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty());

    let Some(challenge) = challenge else {
        warn!(error_class = %ErrorClass::MalformedRequest, "crc_token_missing");
        return (StatusCode::BAD_REQUEST, "no crc token given").into_response();
    };

    let response_token = sign_crc_token(challenge, state.config.crc_secret().as_bytes());

    info!(challenge_length = challenge.len(), "crc_challenge_answered");

    Json(CrcResponse { response_token }).into_response()
}

// =============================================================================
// Account Activity Events
// =============================================================================

/// Account-activity push endpoint.
///
/// 1. Extracts the first mention from the push (other categories are acked)
/// 2. Runs the trigger table
/// 3. On a joke request, fetches a joke and posts it as a reply
pub async fn webhook_event(State(state): State<AppState>, body: Bytes) -> Response {
    info!(body_length = body.len(), "webhook_event_received");

    let event = match extract_mention(&body) {
        Ok(Some(event)) => event,
        Ok(None) => return ok(),
        Err(e) => return extract_failure(&e),
    };

    match state.triggers.decide(&event) {
        TriggerDecision::NoMatch => {
            debug!(reply_target_id = %event.reply_target_id, "trigger_not_matched");
            ok()
        }
        TriggerDecision::JokeRequest => {
            info!(
                reply_target_id = %event.reply_target_id,
                author = %event.author_handle,
                "dadjoke_request_received"
            );
            debug!(body = %String::from_utf8_lossy(&body), "dadjoke_request_body");

            // Detached from the request future: a dropped request must not
            // cut the pipeline between the joke fetch and the reply post.
            let content = Arc::clone(&state.content);
            let dispatcher = Arc::clone(&state.dispatcher);
            let pipeline = tokio::spawn(async move {
                respond_with_joke(content.as_ref(), dispatcher.as_ref(), &event).await
            });

            match pipeline.await {
                Ok(Ok(_)) => ok(),
                Ok(Err(e)) => pipeline_failure(&e),
                Err(e) => {
                    error!(error = %e, "pipeline_task_failed");
                    (StatusCode::BAD_REQUEST, "failed to reply tweet").into_response()
                }
            }
        }
    }
}

fn ok() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Status used for a failed request.
///
/// The webhook provider treats every non-2xx alike, and upstream failures are
/// reported as 400 the same way client errors are.
fn failure_status(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::MalformedRequest
        | ErrorClass::UpstreamFailure
        | ErrorClass::DecodeFailure => StatusCode::BAD_REQUEST,
    }
}

fn extract_failure(e: &ExtractError) -> Response {
    warn!(error = %e, error_class = %e.class(), "webhook_event_rejected");

    let message = match e {
        ExtractError::MalformedJson(_) => "invalid request body",
        ExtractError::SchemaMismatch(_) | ExtractError::EmptyEventList => {
            "invalid tweet_create_events payload"
        }
    };

    (failure_status(e.class()), message).into_response()
}

fn pipeline_failure(e: &PipelineError) -> Response {
    let message = match e {
        PipelineError::ContentFetch(_) => "failed to get dadjoke",
        PipelineError::ReplyDispatch(_) => "failed to reply tweet",
    };

    (failure_status(e.class()), message).into_response()
}
