//! Mock implementations for testing
//!
//! These mocks enable integration testing of the runtime without real I/O.

use super::traits::CompletionClient;
use crate::llm::{CompletionRequest, LlmError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Completion Client
// ============================================================================

type Reply = Result<String, LlmError>;

/// Mock client. Rules match on the prompt and are checked first; otherwise
/// queued replies are returned in order.
#[derive(Default)]
pub struct MockCompletionClient {
    rules: Mutex<Vec<(String, Reply)>>,
    replies: Mutex<VecDeque<Reply>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue an error reply
    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Always answer prompts containing `needle` with `reply`
    pub fn respond_to(&self, needle: impl Into<String>, reply: Reply) {
        self.rules.lock().unwrap().push((needle.into(), reply));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn ask(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());

        let rule = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());
        if let Some(reply) = rule {
            return reply;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock reply queued")))
    }
}

// ============================================================================
// Delayed Mock Client (for in-flight testing)
// ============================================================================

/// Mock client that sleeps before answering
pub struct DelayedMockClient {
    pub inner: MockCompletionClient,
    delay: Duration,
    /// Notified when a request starts
    pub request_started: Arc<Notify>,
}

impl DelayedMockClient {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockCompletionClient::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for DelayedMockClient {
    async fn ask(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.request_started.notify_waiters();
        tokio::time::sleep(self.delay).await;
        self.inner.ask(request).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mediation::prompts::{
        APOLOGY, EMPTY_MESSAGE_ERROR, GREETING, RESOLVING, WAITING_FOR_OTHER_SIDE,
    };
    use crate::mediation::{Phase, ResolutionRequest, Side, SidePair, RESOLUTION_FALLBACK};
    use crate::runtime::{fetch_resolutions, MediationHandle, MediationSnapshot};
    use crate::state_machine::{Event, MediationContext};

    const WAIT: Duration = Duration::from_secs(2);

    async fn wait_for(
        handle: &MediationHandle,
        predicate: impl FnMut(&MediationSnapshot) -> bool,
    ) -> Arc<MediationSnapshot> {
        tokio::time::timeout(WAIT, handle.wait_for(predicate))
            .await
            .expect("timed out waiting for snapshot")
            .expect("runtime stopped")
    }

    fn last_content(snapshot: &MediationSnapshot, side: Side) -> Option<String> {
        snapshot
            .side(side)
            .messages
            .last()
            .map(|m| m.content.clone())
    }

    /// Drive one side through story, restatement and confirmation
    async fn confirm_side(handle: &MediationHandle, side: Side) {
        handle.send_message(side, format!("{side} story")).await.unwrap();
        wait_for(handle, |s| s.side(side).messages.len() == 3).await;
        handle.send_message(side, "Yes, exactly").await.unwrap();
        wait_for(handle, |s| s.side(side).phase == Phase::Classification).await;
    }

    #[tokio::test]
    async fn test_mock_client_order_and_rules() {
        let mock = MockCompletionClient::new();
        mock.queue_reply("first");
        mock.respond_to("special", Ok("matched".to_string()));

        let plain = CompletionRequest::single("hello", "x");
        let special = CompletionRequest::single("a special prompt", "x");

        assert_eq!(mock.ask(&special).await.unwrap(), "matched");
        assert_eq!(mock.ask(&plain).await.unwrap(), "first");
        assert!(mock.ask(&plain).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let client = Arc::new(MockCompletionClient::new());
        client.queue_reply("What happened next?");
        let handle = MediationHandle::spawn(MediationContext::default(), client.clone());

        handle.send_message(Side::Left, "My neighbor is loud").await.unwrap();
        let snap = wait_for(&handle, |s| {
            !s.side(Side::Left).loading && s.side(Side::Left).messages.len() == 3
        })
        .await;

        let left = &snap.side(Side::Left).messages;
        assert_eq!(left[0].content, GREETING);
        assert!(left[1].is_user());
        assert_eq!(left[1].content, "My neighbor is loud");
        assert!(!left[2].is_user());
        assert_eq!(left[2].content, "What happened next?");
        assert_eq!(snap.side(Side::Right).messages.len(), 1);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "My neighbor is loud");
    }

    #[tokio::test]
    async fn test_blank_message_makes_no_call() {
        let client = Arc::new(MockCompletionClient::new());
        let handle = MediationHandle::spawn(MediationContext::default(), client.clone());

        handle.send_message(Side::Right, "   ").await.unwrap();
        let snap = wait_for(&handle, |s| s.side(Side::Right).error.is_some()).await;

        assert_eq!(snap.side(Side::Right).error.as_deref(), Some(EMPTY_MESSAGE_ERROR));
        assert_eq!(snap.side(Side::Right).messages.len(), 1);
        assert!(client.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_call_apologizes_and_clears_loading() {
        let client = Arc::new(MockCompletionClient::new());
        client.queue_error(LlmError::network("Connection failed: refused"));
        let handle = MediationHandle::spawn(MediationContext::default(), client.clone());

        handle.send_message(Side::Left, "hello").await.unwrap();
        let snap = wait_for(&handle, |s| s.side(Side::Left).error.is_some()).await;

        assert!(!snap.side(Side::Left).loading);
        assert_eq!(
            snap.side(Side::Left).error.as_deref(),
            Some("Connection failed: refused")
        );
        assert_eq!(last_content(&snap, Side::Left).as_deref(), Some(APOLOGY));
        assert_eq!(snap.side(Side::Left).messages.len(), 3);
    }

    #[tokio::test]
    async fn test_full_mediation_produces_two_resolutions() {
        let client = Arc::new(MockCompletionClient::new());
        client.respond_to("left story", Ok("You feel the dishes are unfair?".to_string()));
        client.respond_to("right story", Ok("You feel nagged?".to_string()));
        client.respond_to("Yes, exactly", Ok("Got it!".to_string()));
        client.respond_to(
            "You feel the dishes are unfair?",
            Ok("Propose a chore chart.".to_string()),
        );
        client.respond_to("You feel nagged?", Ok("Agree on a signal.".to_string()));

        let handle = MediationHandle::spawn(MediationContext::default(), client.clone());

        confirm_side(&handle, Side::Left).await;
        let snap = handle.snapshot();
        assert_eq!(last_content(&snap, Side::Left).as_deref(), Some(WAITING_FOR_OTHER_SIDE));
        assert!(snap.side(Side::Left).complete);

        handle.send_message(Side::Right, "right story").await.unwrap();
        wait_for(&handle, |s| s.side(Side::Right).messages.len() == 3).await;
        handle.send_message(Side::Right, "Yes, exactly").await.unwrap();

        let snap = wait_for(&handle, |s| {
            s.side(Side::Left).messages.len() == 1 && s.side(Side::Right).messages.len() == 1
        })
        .await;

        assert_eq!(last_content(&snap, Side::Left).as_deref(), Some("Propose a chore chart."));
        assert_eq!(last_content(&snap, Side::Right).as_deref(), Some("Agree on a signal."));
        assert!(!snap.side(Side::Left).complete);
        assert!(!snap.side(Side::Right).complete);

        // Two replies per side plus one resolution per side
        assert_eq!(client.recorded_requests().len(), 6);
    }

    #[tokio::test]
    async fn test_resolving_status_shown_to_second_side() {
        let client = Arc::new(MockCompletionClient::new());
        client.respond_to("story", Ok("Restated.".to_string()));
        client.respond_to("Yes, exactly", Ok("Got it!".to_string()));
        client.respond_to("Restated.", Ok("advice".to_string()));
        let handle = MediationHandle::spawn(MediationContext::default(), client);

        confirm_side(&handle, Side::Left).await;
        handle.send_message(Side::Right, "right story").await.unwrap();
        wait_for(&handle, |s| s.side(Side::Right).messages.len() == 3).await;
        handle.send_message(Side::Right, "Yes, exactly").await.unwrap();

        wait_for(&handle, |s| {
            last_content(s, Side::Right).as_deref() == Some(RESOLVING)
                || last_content(s, Side::Right).as_deref() == Some("advice")
        })
        .await;
    }

    #[tokio::test]
    async fn test_resolution_failure_is_isolated() {
        let client = MockCompletionClient::new();
        client.respond_to("left view", Err(LlmError::server_error("Server error: boom")));
        client.respond_to("right view", Ok("Listen first.".to_string()));

        let outcomes = fetch_resolutions(
            &client,
            &ResolutionRequest {
                statements: SidePair::new("left view".to_string(), "right view".to_string()),
            },
        )
        .await;

        assert_eq!(outcomes.left, Err("Server error: boom".to_string()));
        assert_eq!(outcomes.right, Ok("Listen first.".to_string()));

        let handle = MediationHandle::spawn(MediationContext::default(), client);
        handle
            .send_event(Event::ResolutionsReady { outcomes })
            .await
            .unwrap();
        let snap = wait_for(&handle, |s| s.version > 0).await;
        assert_eq!(last_content(&snap, Side::Left).as_deref(), Some(RESOLUTION_FALLBACK));
        assert_eq!(last_content(&snap, Side::Right).as_deref(), Some("Listen first."));
    }

    #[tokio::test]
    async fn test_barrier_does_not_refire_while_in_flight() {
        let client = Arc::new(DelayedMockClient::new(Duration::from_millis(50)));
        let handle = MediationHandle::spawn(MediationContext::default(), client.clone());

        let started = client.request_started.notified();
        handle.set_completion(Side::Left, true).await.unwrap();
        handle.set_completion(Side::Right, true).await.unwrap();
        tokio::time::timeout(WAIT, started)
            .await
            .expect("resolution fetch never started");

        // Resolutions are in flight; mark one side complete again
        handle.set_completion(Side::Left, true).await.unwrap();

        // No replies are queued, so both resolutions fall back
        let snap = wait_for(&handle, |s| {
            s.side(Side::Right).messages.len() == 1
                && last_content(s, Side::Right).as_deref() == Some(RESOLUTION_FALLBACK)
        })
        .await;
        assert_eq!(last_content(&snap, Side::Left).as_deref(), Some(RESOLUTION_FALLBACK));

        // A second round would have cleared the left flag again
        assert!(snap.side(Side::Left).complete);
        assert!(!snap.side(Side::Right).complete);
        assert_eq!(client.inner.recorded_requests().len(), 2);
        assert_eq!(handle.phase(Side::Left), Phase::Understanding);
        assert!(!handle.is_loading(Side::Left));
        assert!(handle.error(Side::Left).is_none());
        assert_eq!(handle.messages(Side::Left).len(), 1);
    }

    #[tokio::test]
    async fn test_resolutions_are_fetched_concurrently() {
        let client = DelayedMockClient::new(Duration::from_millis(300));
        client.inner.respond_to("left", Ok("left advice".to_string()));
        client.inner.respond_to("right", Ok("right advice".to_string()));

        let start = std::time::Instant::now();
        let outcomes = fetch_resolutions(
            &client,
            &ResolutionRequest {
                statements: SidePair::new("left view".to_string(), "right view".to_string()),
            },
        )
        .await;
        let elapsed = start.elapsed();

        assert_eq!(outcomes.left, Ok("left advice".to_string()));
        assert_eq!(outcomes.right, Ok("right advice".to_string()));
        // Sequential calls would take at least 600ms
        assert!(elapsed < Duration::from_millis(550), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_reset_only_touches_one_side() {
        let client = Arc::new(MockCompletionClient::new());
        client.respond_to("story", Ok("Restated.".to_string()));
        client.respond_to("Yes, exactly", Ok("Got it!".to_string()));
        let handle = MediationHandle::spawn(MediationContext::default(), client);

        confirm_side(&handle, Side::Left).await;
        handle.send_message(Side::Right, "right story").await.unwrap();
        let before = wait_for(&handle, |s| s.side(Side::Right).messages.len() == 3).await;

        handle.reset_conversation(Side::Left).await.unwrap();
        let snap = wait_for(&handle, |s| s.side(Side::Left).phase == Phase::Understanding).await;

        assert_eq!(snap.side(Side::Left).messages.len(), 1);
        assert_eq!(last_content(&snap, Side::Left).as_deref(), Some(GREETING));
        assert!(!snap.side(Side::Left).complete);
        assert_eq!(snap.side(Side::Right), before.side(Side::Right));
    }
}
