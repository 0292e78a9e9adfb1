//! Runtime for executing a mediation
//!
//! A single task owns the state and applies events in order. Completion
//! calls run as background tasks and report back as events. Readers get
//! immutable snapshots.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

#[allow(unused_imports)] // Public API re-exports
pub use executor::{fetch_resolutions, MediationRuntime};
pub use traits::*;

use crate::mediation::{
    ConversationContext, MediationState, Message, Phase, Side, SidePair,
};
use crate::state_machine::{Event, MediationContext};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Everything the presentation layer can read about one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideView {
    pub messages: Vec<Message>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
    pub complete: bool,
    pub context: ConversationContext,
}

impl SideView {
    fn from_state(state: &MediationState, side: Side) -> Self {
        Self {
            messages: state.messages_for(side),
            loading: state.is_loading(side),
            error: state.error(side).map(str::to_string),
            phase: state.phase(side),
            complete: state.is_complete(side),
            context: state.context(side).clone(),
        }
    }
}

/// Immutable view of the state after one transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediationSnapshot {
    pub version: u64,
    pub sides: SidePair<SideView>,
}

impl MediationSnapshot {
    pub fn from_state(version: u64, state: &MediationState) -> Self {
        Self {
            version,
            sides: SidePair::from_fn(|side| SideView::from_state(state, side)),
        }
    }

    pub fn side(&self, side: Side) -> &SideView {
        self.sides.get(side)
    }
}

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Init { snapshot: Arc<MediationSnapshot> },
    StateChange { snapshot: Arc<MediationSnapshot> },
}

/// Cloneable handle to a running mediation
#[derive(Clone)]
pub struct MediationHandle {
    event_tx: mpsc::Sender<Event>,
    snapshot_rx: watch::Receiver<Arc<MediationSnapshot>>,
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl MediationHandle {
    /// Start a runtime task and return a handle to it
    pub fn spawn<C>(context: MediationContext, client: C) -> Self
    where
        C: CompletionClient + 'static,
    {
        Self::spawn_with_state(context, MediationState::new(), client)
    }

    pub fn spawn_with_state<C>(context: MediationContext, state: MediationState, client: C) -> Self
    where
        C: CompletionClient + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (snapshot_tx, snapshot_rx) =
            watch::channel(Arc::new(MediationSnapshot::from_state(0, &state)));

        let runtime = MediationRuntime::new(
            context,
            state,
            client,
            event_rx,
            event_tx.clone(),
            snapshot_tx,
            broadcast_tx.clone(),
        );
        tokio::spawn(runtime.run());

        Self {
            event_tx,
            snapshot_rx,
            broadcast_tx,
        }
    }

    /// Queue an event for the runtime
    pub async fn send_event(&self, event: Event) -> Result<(), String> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {e}"))
    }

    /// Fire-and-forget: the reply lands in later snapshots
    pub async fn send_message(&self, side: Side, text: impl Into<String>) -> Result<(), String> {
        self.send_event(Event::UserMessage {
            side,
            text: text.into(),
        })
        .await
    }

    pub async fn reset_conversation(&self, side: Side) -> Result<(), String> {
        self.send_event(Event::ResetConversation { side }).await
    }

    pub async fn set_completion(&self, side: Side, complete: bool) -> Result<(), String> {
        self.send_event(Event::SetCompletion { side, complete }).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<MediationSnapshot> {
        self.snapshot_rx.borrow().clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    #[allow(dead_code)] // In-process callers; HTTP clients use the SSE stream
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&MediationSnapshot) -> bool,
    ) -> Result<Arc<MediationSnapshot>, String> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|e| format!("Runtime stopped: {e}"))?;
        Ok(snapshot.clone())
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }

    // Selectors over the latest snapshot. The HTTP layer reads whole
    // snapshots; these serve in-process callers.

    #[allow(dead_code)]
    pub fn messages(&self, side: Side) -> Vec<Message> {
        self.snapshot().side(side).messages.clone()
    }

    #[allow(dead_code)]
    pub fn is_loading(&self, side: Side) -> bool {
        self.snapshot().side(side).loading
    }

    #[allow(dead_code)]
    pub fn error(&self, side: Side) -> Option<String> {
        self.snapshot().side(side).error.clone()
    }

    #[allow(dead_code)]
    pub fn phase(&self, side: Side) -> Phase {
        self.snapshot().side(side).phase
    }

    #[allow(dead_code)]
    pub fn is_complete(&self, side: Side) -> bool {
        self.snapshot().side(side).complete
    }
}
