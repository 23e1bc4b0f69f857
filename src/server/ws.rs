//! WebSocket adapter: one subscription per connection, one text frame per event.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};

use super::{AppState, frame::IdFrame};
use crate::Subscription;

/// `GET /ws/profiles`
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| async move {
        let subscription = state.bridge.subscribe();
        forward(socket, subscription).await;
    })
}

/// Pumps events into the socket until the client leaves, a send fails or the
/// subscription ends. The subscription is detached on every exit path.
async fn forward(socket: WebSocket, mut subscription: Subscription) {
    let id = subscription.id();
    let (mut sender, mut receiver) = socket.split();
    tracing::debug!(subscription = %id, "websocket client attached");

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else {
                    tracing::debug!(subscription = %id, "subscription ended");
                    break;
                };
                let frame = match serde_json::to_string(&IdFrame::from(event.as_ref())) {
                    Ok(frame) => frame,
                    Err(err) => {
                        tracing::warn!(subscription = %id, error = %err, "frame encoding failed");
                        continue;
                    }
                };
                if sender.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    }

    subscription.detach();
    if let Err(err) = sender.close().await {
        tracing::debug!(subscription = %id, error = %err, "websocket close failed");
    }
    tracing::debug!(subscription = %id, "websocket client detached");
}
