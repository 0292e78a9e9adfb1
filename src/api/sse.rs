//! Server-Sent Events support

use crate::runtime::SseEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Initial snapshot followed by one event per published change
pub fn sse_stream(
    init_event: SseEvent,
    broadcast_rx: tokio::sync::broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(sse_event_to_axum(&init_event)) });

    // A lagged client skips ahead; the next snapshot carries the full state
    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(sse_event_to_axum(&event))),
        Err(_) => None,
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn sse_payload(event: &SseEvent) -> serde_json::Value {
    match event {
        SseEvent::Init { snapshot } => json!({
            "type": "init",
            "snapshot": snapshot.as_ref(),
        }),
        SseEvent::StateChange { snapshot } => json!({
            "type": "state_change",
            "snapshot": snapshot.as_ref(),
        }),
    }
}

fn sse_event_to_axum(event: &SseEvent) -> Event {
    Event::default()
        .event("snapshot")
        .data(sse_payload(event).to_string())
}
