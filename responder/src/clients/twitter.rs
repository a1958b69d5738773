//! Reply dispatch through the Twitter v1.1 `statuses/update` endpoint.

use async_trait::async_trait;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::clients::oauth::{percent_encode, OAuthSigner};
use crate::error::{Classify, ErrorClass};

/// Failure while posting a reply.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("reply request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("reply API response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("reply API returned status code {status}")]
    Upstream { status: u16 },

    #[error("reply request could not be signed: {0}")]
    Signing(#[source] std::time::SystemTimeError),
}

impl Classify for DispatchError {
    fn class(&self) -> ErrorClass {
        match self {
            DispatchError::Decode(_) => ErrorClass::DecodeFailure,
            DispatchError::Transport(_)
            | DispatchError::Upstream { .. }
            | DispatchError::Signing(_) => ErrorClass::UpstreamFailure,
        }
    }
}

/// Acknowledgement of a posted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyReceipt {
    /// Id of the created status, when the API returned one
    pub status_id: Option<String>,
}

/// Posts replies to the write API.
#[async_trait]
pub trait ReplyDispatcher: Send + Sync {
    /// Post `status` as a reply to the tweet `in_reply_to_status_id`.
    async fn reply(
        &self,
        status: &str,
        in_reply_to_status_id: &str,
    ) -> Result<ReplyReceipt, DispatchError>;
}

/// OAuth 1.0a client for the write API.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: Client,
    base_url: String,
    signer: OAuthSigner,
}

impl TwitterClient {
    pub fn new(client: Client, base_url: &str, signer: OAuthSigner) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
        }
    }

    fn update_url(&self) -> String {
        format!("{}/statuses/update.json", self.base_url)
    }
}

#[async_trait]
impl ReplyDispatcher for TwitterClient {
    async fn reply(
        &self,
        status: &str,
        in_reply_to_status_id: &str,
    ) -> Result<ReplyReceipt, DispatchError> {
        let url = self.update_url();
        let params = [
            ("status", status),
            ("in_reply_to_status_id", in_reply_to_status_id),
        ];

        let authorization = self
            .signer
            .authorization_header("POST", &url, &params)
            .map_err(DispatchError::Signing)?;

        let form = params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        info!(
            in_reply_to_status_id = in_reply_to_status_id,
            status_length = status.chars().count(),
            "reply_post_starting"
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, timeout = e.is_timeout(), "reply_post_transport_error");
                DispatchError::Transport(e)
            })?;

        let status_code = response.status().as_u16();
        let body = response.bytes().await.map_err(DispatchError::Transport)?;

        // The body is decoded before the status is looked at, so a non-JSON
        // error page surfaces as a decode failure.
        let data: Map<String, Value> = serde_json::from_slice(&body).map_err(|e| {
            error!(status_code = status_code, error = %e, "reply_post_decode_error");
            DispatchError::Decode(e)
        })?;

        if status_code >= 400 {
            error!(
                status_code = status_code,
                errors = ?data.get("errors"),
                "reply_post_upstream_error"
            );
            return Err(DispatchError::Upstream {
                status: status_code,
            });
        }

        let status_id = data
            .get("id_str")
            .and_then(Value::as_str)
            .map(str::to_string);

        info!(
            in_reply_to_status_id = in_reply_to_status_id,
            status_id = ?status_id,
            "reply_posted"
        );

        Ok(ReplyReceipt { status_id })
    }
}
