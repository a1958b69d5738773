//! Extraction of mention events from raw account-activity pushes.
//!
//! Parsing happens in two passes: a generic JSON pass decides whether the push
//! carries `tweet_create_events` at all, and only then is the body decoded
//! against the typed schema. Every other event category is a no-op.

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{Classify, ErrorClass};
use crate::event::types::{MentionEvent, MentionHook, TWEET_CREATE_EVENTS};

/// Reasons a push body cannot be turned into a mention event.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("request body is not a JSON object")]
    MalformedJson(#[source] Option<serde_json::Error>),

    #[error("tweet_create_events payload does not match the expected schema")]
    SchemaMismatch(#[source] serde_json::Error),

    #[error("tweet_create_events is empty")]
    EmptyEventList,
}

impl Classify for ExtractError {
    fn class(&self) -> ErrorClass {
        ErrorClass::MalformedRequest
    }
}

/// Extract the mention event from a raw push body.
///
/// Returns `Ok(None)` for pushes without `tweet_create_events` and for a
/// `null` body. When the list holds several events only the first one is
/// acted upon.
pub fn extract_mention(body: &[u8]) -> Result<Option<MentionEvent>, ExtractError> {
    let raw: Value =
        serde_json::from_slice(body).map_err(|e| ExtractError::MalformedJson(Some(e)))?;

    if raw.is_null() {
        info!("webhook_event_null");
        return Ok(None);
    }

    let Some(object) = raw.as_object() else {
        return Err(ExtractError::MalformedJson(None));
    };

    if !object.contains_key(TWEET_CREATE_EVENTS) {
        info!(
            keys = ?object.keys().collect::<Vec<_>>(),
            "webhook_event_ignored"
        );
        return Ok(None);
    }

    let hook: MentionHook = serde_json::from_value(raw).map_err(ExtractError::SchemaMismatch)?;

    let event_count = hook.tweet_create_events.len();
    let Some(first) = hook.tweet_create_events.into_iter().next() else {
        warn!(for_user_id = ?hook.for_user_id, "webhook_event_list_empty");
        return Err(ExtractError::EmptyEventList);
    };

    let in_reply_to_status_id = first.in_reply_to_status_id_str.clone();
    let in_reply_to_screen_name = first.in_reply_to_screen_name.clone();
    let author_id = first.user.id_str.clone();
    let mention = MentionEvent::from(first);

    info!(
        for_user_id = ?hook.for_user_id,
        user_has_blocked = ?hook.user_has_blocked,
        author_id = ?author_id,
        in_reply_to_status_id = ?in_reply_to_status_id,
        in_reply_to_screen_name = ?in_reply_to_screen_name,
        reply_target_id = %mention.reply_target_id,
        author = %mention.author_handle,
        text_length = mention.text.len(),
        events_ignored = event_count - 1,
        "mention_extracted"
    );

    Ok(Some(mention))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tweet(id: &str, text: &str, author: &str) -> Value {
        json!({
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "id": 1050118621198921728u64,
            "id_str": id,
            "text": text,
            "in_reply_to_status_id": null,
            "in_reply_to_status_id_str": null,
            "in_reply_to_screen_name": null,
            "user": {
                "id": 6253282,
                "id_str": "6253282",
                "name": "Some Name",
                "screen_name": author,
                "location": null
            },
            "entities": { "hashtags": [], "user_mentions": [] }
        })
    }

    #[test]
    fn test_extract_first_event() {
        let body = json!({
            "for_user_id": "2244994945",
            "tweet_create_events": [
                tweet("1050118621198921728", "check out #dadjoke please", "alice"),
                tweet("1050118621198921729", "second", "bob"),
            ]
        });

        let event = extract_mention(body.to_string().as_bytes()).unwrap().unwrap();

        assert_eq!(event.text, "check out #dadjoke please");
        assert_eq!(event.reply_target_id, "1050118621198921728");
        assert_eq!(event.author_handle, "alice");
    }

    #[test]
    fn test_extract_other_event_category() {
        let body = json!({
            "for_user_id": "2244994945",
            "favorite_events": [{ "id": "a7ba59eab0bfcba386f7acedac279542" }]
        });

        assert!(extract_mention(body.to_string().as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_extract_malformed_json() {
        let err = extract_mention(b"{not json").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedJson(Some(_))));
    }

    #[test]
    fn test_extract_null_body_is_noop() {
        assert!(extract_mention(b"null").unwrap().is_none());
    }

    #[test]
    fn test_extract_reply_context_is_optional() {
        let body = json!({
            "tweet_create_events": [{
                "id_str": "1050118621198921728",
                "text": "@bot #dadjoke",
                "in_reply_to_status_id_str": "1050118621198921700",
                "in_reply_to_screen_name": "bot",
                "user": { "screen_name": "alice" }
            }]
        });

        let event = extract_mention(body.to_string().as_bytes()).unwrap().unwrap();

        assert_eq!(event.author_handle, "alice");
        assert_eq!(event.reply_target_id, "1050118621198921728");
    }

    #[test]
    fn test_extract_non_object_json() {
        let err = extract_mention(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedJson(None)));
    }

    #[test]
    fn test_extract_empty_event_list() {
        let body = json!({ "tweet_create_events": [] });
        let err = extract_mention(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, ExtractError::EmptyEventList));
    }

    #[test]
    fn test_extract_missing_screen_name() {
        let body = json!({
            "tweet_create_events": [{
                "id_str": "1",
                "text": "#dadjoke",
                "user": { "id_str": "2" }
            }]
        });

        let err = extract_mention(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, ExtractError::SchemaMismatch(_)));
    }

    #[test]
    fn test_extract_events_not_a_list() {
        let body = json!({ "tweet_create_events": { "id_str": "1" } });
        let err = extract_mention(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, ExtractError::SchemaMismatch(_)));
    }

    #[test]
    fn test_errors_are_malformed_requests() {
        assert_eq!(ExtractError::EmptyEventList.class(), ErrorClass::MalformedRequest);
    }
}
