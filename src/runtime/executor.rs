//! Mediation runtime executor

use super::traits::CompletionClient;
use super::{MediationSnapshot, SseEvent};
use crate::llm::CompletionRequest;
use crate::mediation::prompts::resolution_instructions;
use crate::mediation::{MediationState, ResolutionRequest, Side, SidePair};
use crate::state_machine::{transition, Effect, Event, MediationContext};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Owns the mediation state; every change goes through `transition`
pub struct MediationRuntime<C>
where
    C: CompletionClient + 'static,
{
    context: MediationContext,
    state: MediationState,
    client: Arc<C>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    snapshot_tx: watch::Sender<Arc<MediationSnapshot>>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    version: u64,
}

impl<C> MediationRuntime<C>
where
    C: CompletionClient + 'static,
{
    pub fn new(
        context: MediationContext,
        state: MediationState,
        client: C,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        snapshot_tx: watch::Sender<Arc<MediationSnapshot>>,
        broadcast_tx: broadcast::Sender<SseEvent>,
    ) -> Self {
        Self {
            context,
            state,
            client: Arc::new(client),
            event_rx,
            event_tx,
            snapshot_tx,
            broadcast_tx,
            version: 0,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting mediation runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        tracing::info!("Mediation runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        tracing::debug!(event = ?event, "Processing event");

        // Pure state transition
        let result = transition(&self.state, &self.context, event);
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PublishSnapshot => {
                self.version += 1;
                let snapshot = Arc::new(MediationSnapshot::from_state(self.version, &self.state));
                self.snapshot_tx.send_replace(snapshot.clone());
                let _ = self.broadcast_tx.send(SseEvent::StateChange { snapshot });
            }

            Effect::RequestReply { side, request } => {
                let client = self.client.clone();
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    tracing::info!(side = %side, history = request.history.len(), "Requesting reply (background)");

                    let event = match client.ask(&request).await {
                        Ok(text) => Event::ReplyReceived { side, text },
                        Err(e) => Event::ReplyFailed {
                            side,
                            message: e.message,
                        },
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::RequestResolutions(request) => {
                let client = self.client.clone();
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    let outcomes = fetch_resolutions(client.as_ref(), &request).await;
                    let _ = event_tx.send(Event::ResolutionsReady { outcomes }).await;
                });
            }
        }
    }
}

/// Ask for both resolutions concurrently and wait for both.
/// Each side fails independently.
pub async fn fetch_resolutions<C>(
    client: &C,
    request: &ResolutionRequest,
) -> SidePair<Result<String, String>>
where
    C: CompletionClient + ?Sized,
{
    let ask = |side: Side| {
        let statement = request.statements.get(side).clone();
        async move {
            let req = CompletionRequest::single(
                statement.clone(),
                resolution_instructions(&statement),
            );
            client.ask(&req).await.map_err(|e| e.message)
        }
    };

    let (left, right) = tokio::join!(ask(Side::Left), ask(Side::Right));
    SidePair::new(left, right)
}
