//! Fetch-then-reply pipeline for triggered mentions.
//!
//! ## Phases
//!
//! ```text
//! MentionEvent → fetch_content() → PreparedReply → dispatch_reply() → PostedReply
//! ```
//!
//! Each phase fails with its own error variant. A failed fetch never reaches
//! the dispatcher and nothing is retried or compensated.

use thiserror::Error;
use tracing::{error, info};

use crate::clients::{
    ContentProvider, DispatchError, FetchError, ReplyContent, ReplyDispatcher, ReplyReceipt,
};
use crate::error::{Classify, ErrorClass};
use crate::event::MentionEvent;

/// Failure of one of the two pipeline phases.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to get reply content: {0}")]
    ContentFetch(#[source] FetchError),

    #[error("failed to post reply: {0}")]
    ReplyDispatch(#[source] DispatchError),
}

impl Classify for PipelineError {
    fn class(&self) -> ErrorClass {
        match self {
            PipelineError::ContentFetch(e) => e.class(),
            PipelineError::ReplyDispatch(e) => e.class(),
        }
    }
}

/// Output of the fetch phase: reply text ready to be posted.
#[derive(Debug, Clone)]
pub struct PreparedReply {
    pub status: String,
    pub in_reply_to_status_id: String,
    pub content: ReplyContent,
}

/// Output of the dispatch phase.
#[derive(Debug, Clone)]
pub struct PostedReply {
    pub prepared: PreparedReply,
    pub receipt: ReplyReceipt,
}

/// Reply text addressed to the mention's author.
pub fn compose_reply(author_handle: &str, joke: &str) -> String {
    format!("@{} {}", author_handle, joke)
}

/// Phase one: fetch a joke and compose the reply.
pub async fn fetch_content(
    provider: &dyn ContentProvider,
    event: &MentionEvent,
) -> Result<PreparedReply, PipelineError> {
    let content = provider.fetch_joke().await.map_err(|e| {
        error!(
            error = %e,
            error_class = %e.class(),
            reply_target_id = %event.reply_target_id,
            "pipeline_fetch_failed"
        );
        PipelineError::ContentFetch(e)
    })?;

    Ok(PreparedReply {
        status: compose_reply(&event.author_handle, &content.joke),
        in_reply_to_status_id: event.reply_target_id.clone(),
        content,
    })
}

/// Phase two: post the prepared reply.
pub async fn dispatch_reply(
    dispatcher: &dyn ReplyDispatcher,
    prepared: PreparedReply,
) -> Result<PostedReply, PipelineError> {
    let receipt = dispatcher
        .reply(&prepared.status, &prepared.in_reply_to_status_id)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                error_class = %e.class(),
                reply_target_id = %prepared.in_reply_to_status_id,
                "pipeline_dispatch_failed"
            );
            PipelineError::ReplyDispatch(e)
        })?;

    Ok(PostedReply { prepared, receipt })
}

/// Run both phases for a mention that asked for a joke.
pub async fn respond_with_joke(
    provider: &dyn ContentProvider,
    dispatcher: &dyn ReplyDispatcher,
    event: &MentionEvent,
) -> Result<PostedReply, PipelineError> {
    let prepared = fetch_content(provider, event).await?;
    let posted = dispatch_reply(dispatcher, prepared).await?;

    info!(
        reply_target_id = %posted.prepared.in_reply_to_status_id,
        joke_id = %posted.prepared.content.id,
        status_id = ?posted.receipt.status_id,
        "pipeline_complete"
    );

    Ok(posted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedJoke(Option<u16>);

    #[async_trait]
    impl ContentProvider for FixedJoke {
        async fn fetch_joke(&self) -> Result<ReplyContent, FetchError> {
            match self.0 {
                Some(status) => Err(FetchError::Upstream { status }),
                None => Ok(ReplyContent {
                    id: "0189hNRf2g".to_string(),
                    joke: "I'm tired of following my dreams. I'm just going to ask them where they are going and meet up with them later.".to_string(),
                    status: 200,
                }),
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: AtomicUsize,
        replies: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ReplyDispatcher for Recorder {
        async fn reply(&self, status: &str, id: &str) -> Result<ReplyReceipt, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .push((status.to_string(), id.to_string()));
            Ok(ReplyReceipt {
                status_id: Some("2".to_string()),
            })
        }
    }

    fn mention() -> MentionEvent {
        MentionEvent {
            text: "check out #dadjoke please".to_string(),
            reply_target_id: "1050118621198921728".to_string(),
            author_handle: "alice".to_string(),
        }
    }

    #[test]
    fn test_compose_reply() {
        assert_eq!(compose_reply("alice", "a joke"), "@alice a joke");
    }

    #[tokio::test]
    async fn test_respond_with_joke() {
        let recorder = Recorder::default();

        let posted = respond_with_joke(&FixedJoke(None), &recorder, &mention())
            .await
            .unwrap();

        assert_eq!(posted.receipt.status_id.as_deref(), Some("2"));

        let replies = recorder.replies.lock().unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].0.starts_with("@alice I'm tired"));
        assert_eq!(replies[0].1, "1050118621198921728");
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_dispatch() {
        let recorder = Recorder::default();

        let err = respond_with_joke(&FixedJoke(Some(500)), &recorder, &mention())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::ContentFetch(FetchError::Upstream { status: 500 })
        ));
        assert_eq!(err.class(), ErrorClass::UpstreamFailure);
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }
}
