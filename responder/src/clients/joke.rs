//! Joke content provider backed by icanhazdadjoke.com.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::error::{Classify, ErrorClass};

/// Reply content returned by the joke API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyContent {
    #[serde(default)]
    pub id: String,
    pub joke: String,
    #[serde(default)]
    pub status: u16,
}

/// Failure while fetching reply content.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("joke request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("joke API returned status code {status}")]
    Upstream { status: u16 },

    #[error("joke API response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Classify for FetchError {
    fn class(&self) -> ErrorClass {
        match self {
            FetchError::Transport(_) | FetchError::Upstream { .. } => ErrorClass::UpstreamFailure,
            FetchError::Decode(_) => ErrorClass::DecodeFailure,
        }
    }
}

/// Source of reply content.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Fetch a single random joke.
    async fn fetch_joke(&self) -> Result<ReplyContent, FetchError>;
}

/// HTTP client for the joke API.
#[derive(Debug, Clone)]
pub struct DadJokeClient {
    client: Client,
    url: String,
}

impl DadJokeClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ContentProvider for DadJokeClient {
    async fn fetch_joke(&self) -> Result<ReplyContent, FetchError> {
        info!(url = %self.url, "joke_fetch_starting");

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.url, error = %e, timeout = e.is_timeout(), "joke_fetch_transport_error");
                FetchError::Transport(e)
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(FetchError::Transport)?;

        if status >= 400 {
            error!(url = %self.url, status_code = status, "joke_fetch_upstream_error");
            return Err(FetchError::Upstream { status });
        }

        let content: ReplyContent = serde_json::from_slice(&body).map_err(|e| {
            error!(url = %self.url, error = %e, body_length = body.len(), "joke_fetch_decode_error");
            FetchError::Decode(e)
        })?;

        info!(
            joke_id = %content.id,
            joke_length = content.joke.len(),
            status_code = status,
            "joke_fetched"
        );

        Ok(content)
    }
}
