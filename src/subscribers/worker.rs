//! Worker task driving one push-style sink.

use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;

use super::subscriber::Subscribe;
use super::subscription::Subscription;

/// Why a sink worker stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkExit {
    /// The subscription ended (detached externally or bridge closed).
    Ended,
    /// The sink returned an error; carries its label.
    Failed(&'static str),
    /// The sink panicked; carries the panic message.
    Panicked(String),
}

/// Spawns the worker that feeds `sub` into `sink` until either side gives up.
pub(crate) fn spawn(sink: Arc<dyn Subscribe>, mut sub: Subscription) -> JoinHandle<SinkExit> {
    tokio::spawn(async move {
        let name = sink.name();
        let id = sub.id();

        let exit = loop {
            let Some(ev) = sub.recv().await else {
                break SinkExit::Ended;
            };
            let fut = sink.on_event(ev.as_ref());

            match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        sink = name,
                        subscription = %id,
                        seq = ev.seq,
                        reason = err.as_label(),
                        "{}; sink detached",
                        err.as_message()
                    );
                    break SinkExit::Failed(err.as_label());
                }
                Err(panic_err) => {
                    let info = panic_message(&*panic_err);
                    tracing::error!(sink = name, subscription = %id, info = %info, "sink panicked; detached");
                    break SinkExit::Panicked(info);
                }
            }
        };

        sub.detach();
        tracing::debug!(sink = name, subscription = %id, ?exit, "sink worker stopped");
        exit
    })
}

pub(crate) fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
