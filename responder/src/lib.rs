//! Mention Responder - account-activity webhook that answers `#dadjoke` mentions.
//!
//! ## Architecture
//!
//! ```text
//! GET  /webhook/twitter → CRC signer → {"response_token": "sha256=..."}
//! POST /webhook/twitter → extractor → trigger table → joke API → reply API
//! ```
//!
//! Nothing is persisted; every request is handled on its own.

pub mod clients;
pub mod config;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod web;

// Re-export commonly used types
pub use clients::{ContentProvider, DadJokeClient, OAuthSigner, ReplyDispatcher, TwitterClient};
pub use config::Config;
pub use error::ErrorClass;
pub use event::{extract_mention, MentionEvent, TriggerDecision, TriggerMatcher};
pub use web::{build_router, AppState};
