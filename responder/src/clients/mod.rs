//! Outbound API clients.
//!
//! - [`joke`]: read-only content API supplying reply text
//! - [`twitter`]: OAuth 1.0a signed write API used to post replies

pub mod joke;
pub mod oauth;
pub mod twitter;

use std::time::Duration;

use reqwest::Client;

use crate::Config;

pub use joke::{ContentProvider, DadJokeClient, FetchError, ReplyContent};
pub use oauth::OAuthSigner;
pub use twitter::{DispatchError, ReplyDispatcher, ReplyReceipt, TwitterClient};

/// Build the HTTP client shared by all outbound calls.
pub fn build_http_client(config: &Config) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .user_agent(format!("mention-responder/{}", env!("CARGO_PKG_VERSION")))
        .build()
}
