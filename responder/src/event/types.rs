//! Account-activity payload types.
//!
//! Only the fields the responder acts on (plus a little envelope metadata
//! used for logging) are modeled. Unknown fields are ignored.

use serde::Deserialize;

/// Envelope key holding newly created tweets that mention the subscriber.
pub const TWEET_CREATE_EVENTS: &str = "tweet_create_events";

/// Account-activity push carrying `tweet_create_events`.
#[derive(Debug, Clone, Deserialize)]
pub struct MentionHook {
    /// Subscribed user the event was delivered for
    #[serde(default)]
    pub for_user_id: Option<String>,

    /// Set when the author of the event is blocked by the subscriber
    #[serde(default)]
    pub user_has_blocked: Option<bool>,

    pub tweet_create_events: Vec<TweetCreateEvent>,
}

/// A single created tweet.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetCreateEvent {
    pub id_str: String,
    pub text: String,
    pub user: TweetAuthor,

    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,

    #[serde(default)]
    pub in_reply_to_screen_name: Option<String>,
}

/// Author of a created tweet.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetAuthor {
    pub screen_name: String,

    #[serde(default)]
    pub id_str: Option<String>,
}

/// Minimal record the trigger logic works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionEvent {
    /// Tweet text
    pub text: String,
    /// Id of the tweet a reply should target
    pub reply_target_id: String,
    /// Screen name of the tweet author, without the `@`
    pub author_handle: String,
}

impl From<TweetCreateEvent> for MentionEvent {
    fn from(event: TweetCreateEvent) -> Self {
        Self {
            text: event.text,
            reply_target_id: event.id_str,
            author_handle: event.user.screen_name,
        }
    }
}
