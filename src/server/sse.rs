//! Server-sent events adapter.
//!
//! The subscription lives inside the response stream: when the client goes away
//! hyper drops the body, the subscription is dropped and detaches itself.
//!
//! Frames carry no `id:` field. `seq` follows event creation, not emission
//! order, so it cannot serve as a `Last-Event-ID`; there is no replay anyway.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};

use super::{AppState, frame::CreatedFrame};

/// `GET /sse/profiles`
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let subscription = state.bridge.subscribe();
    tracing::debug!(subscription = %subscription.id(), "sse client attached");

    let events = subscription.filter_map(|event| async move {
        match SseEvent::default().json_data(CreatedFrame::from(event.as_ref())) {
            Ok(frame) => Some(Ok(frame)),
            Err(err) => {
                tracing::warn!(seq = event.seq, error = %err, "frame encoding failed");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
