//! Inbound event handling.
//!
//! ## Flow
//!
//! ```text
//! raw body → extract_mention() → MentionEvent → TriggerMatcher::decide() → TriggerDecision
//! ```

pub mod extractor;
pub mod trigger;
pub mod types;

pub use extractor::{extract_mention, ExtractError};
pub use trigger::{TriggerDecision, TriggerMatcher, TriggerRule};
pub use types::{MentionEvent, MentionHook, TweetCreateEvent};
