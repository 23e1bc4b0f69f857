//! Profile service: REST endpoints plus live WebSocket and SSE feeds of created profiles.
//!
//! ```text
//! RUST_LOG=debug profile-feed --bind 127.0.0.1:8080 --seed-demo
//! ```

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use profile_feed::{
    Bridge, Config, RuntimeError,
    profiles::{MemoryStore, ProfileStore, seed_demo},
    server::{self, AppState},
    wait_for_shutdown_signal,
};

#[derive(Parser, Debug)]
#[command(name = "profile-feed", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Per-subscriber queue capacity; a subscriber that falls this far behind is detached.
    #[arg(long, env = "FEED_SUBSCRIBER_CAPACITY", default_value_t = 256)]
    subscriber_capacity: usize,

    /// Seconds to wait for the pump and sink workers at shutdown.
    #[arg(long, env = "FEED_GRACE_SECS", default_value_t = 5)]
    grace_secs: u64,

    /// Replace the store content with demo profiles A..D at startup.
    #[arg(long, env = "SEED_DEMO")]
    seed_demo: bool,

    /// Origin allowed to read the SSE feed cross-origin; empty disables CORS.
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    cors_origin: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cors = match args.cors_origin.trim() {
        "" => None,
        origin => Some(HeaderValue::from_str(origin).context("invalid CORS origin")?),
    };

    let cfg = Config {
        subscriber_capacity: args.subscriber_capacity,
        grace: Duration::from_secs(args.grace_secs),
    };
    let builder = Bridge::builder(cfg);
    #[cfg(feature = "logging")]
    let builder = {
        let sinks: Vec<Arc<dyn profile_feed::Subscribe>> =
            vec![Arc::new(profile_feed::LogWriter::new())];
        builder.with_subscribers(sinks)
    };
    let bridge = builder.build();

    let store = Arc::new(MemoryStore::new());
    if args.seed_demo {
        seed_demo(store.as_ref()).await.context("seeding demo profiles")?;
    }
    let store: Arc<dyn ProfileStore> = store;

    let app = server::router(AppState::new(store, Arc::clone(&bridge)), cors);
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    tracing::info!(addr = %args.bind, "listening");

    let feed = Arc::clone(&bridge);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(err) = wait_for_shutdown_signal().await {
                tracing::error!(error = %err, "signal handler failed, shutting down");
            }
            // Ends every feed stream so open WS/SSE connections can complete.
            match feed.shutdown().await {
                Ok(()) => {}
                Err(err @ RuntimeError::GraceExceeded { .. }) => {
                    tracing::warn!(label = err.as_label(), error = %err, "feed shutdown incomplete");
                }
                Err(err) => tracing::error!(label = err.as_label(), error = %err, "feed shutdown failed"),
            }
        })
        .await
        .context("server error")?;

    tracing::info!("stopped");
    Ok(())
}
