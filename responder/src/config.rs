//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into an immutable [`Config`] that is
//! shared with request handlers through `AppState`.

use std::env;
use std::fmt;

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Default base URL of the Twitter v1.1 write API.
pub const DEFAULT_TWITTER_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Default joke source.
pub const DEFAULT_DADJOKE_API_URL: &str = "https://icanhazdadjoke.com/";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// OAuth 1.0a credentials for the write API.
#[derive(Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credentials used to sign reply requests. The consumer secret doubles
    /// as the CRC shared secret.
    pub credentials: OAuthCredentials,

    /// Base URL of the write API, without trailing slash
    pub twitter_base_url: String,

    /// Endpoint returning a random joke as JSON
    pub dadjoke_api_url: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Timeout for each outbound HTTP request in milliseconds
    pub request_timeout_ms: u64,

    /// Upper bound on handling a single inbound request, in seconds. The
    /// default leaves room for both outbound calls at their full timeout.
    pub server_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = OAuthCredentials {
            consumer_key: required("TWITTER_CONSUMER_KEY")?,
            consumer_secret: required("TWITTER_CONSUMER_SECRET")?,
            access_token: required("TWITTER_ACCESS_TOKEN")?,
            access_token_secret: required("TWITTER_ACCESS_TOKEN_SECRET")?,
        };

        let twitter_base_url = url_or_default("TWITTER_BASE_URL", DEFAULT_TWITTER_BASE_URL)?
            .trim_end_matches('/')
            .to_string();

        let dadjoke_api_url = url_or_default("DADJOKE_API_URL", DEFAULT_DADJOKE_API_URL)?;

        Ok(Config {
            credentials,
            twitter_base_url,
            dadjoke_api_url,
            port: parse_or_default("PORT", 8080),
            request_timeout_ms: parse_or_default("REQUEST_TIMEOUT_MS", 7_000),
            server_timeout_secs: parse_or_default("SERVER_TIMEOUT_SECS", 15),
        })
    }

    /// Secret used to answer CRC challenges.
    pub fn crc_secret(&self) -> &str {
        &self.credentials.consumer_secret
    }
}

/// Read a variable that must be present and non-empty.
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Read a URL variable, falling back to `default` when unset.
fn url_or_default(name: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string());

    Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { name, source })?;

    Ok(raw)
}

/// Parse a numeric variable, warning and using `default` when it is malformed.
fn parse_or_default<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

#[cfg(test)]
impl Config {
    /// Configuration with dummy credentials for unit tests.
    pub fn for_tests(secret: &str) -> Self {
        Config {
            credentials: OAuthCredentials {
                consumer_key: "consumer-key".to_string(),
                consumer_secret: secret.to_string(),
                access_token: "access-token".to_string(),
                access_token_secret: "access-token-secret".to_string(),
            },
            twitter_base_url: "http://127.0.0.1:9".to_string(),
            dadjoke_api_url: "http://127.0.0.1:9/".to_string(),
            port: 0,
            request_timeout_ms: 1_000,
            server_timeout_secs: 5,
        }
    }
}
