//! # HTTP surface.
//!
//! ```text
//! POST /profiles          create (publishes one event)
//! GET  /profiles          list
//! GET  /profiles/{id}     fetch
//! GET  /ws/profiles       WebSocket feed, text frames {"id": ..}
//! GET  /sse/profiles      SSE feed, data frames {"seq", "timestamp", "profile"}
//! ```
//!
//! Both feed endpoints share the process-wide [`Bridge`]; each connection is one
//! subscription.

mod error;
mod frame;
mod rest;
mod sse;
mod ws;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::{Bridge, profiles::ProfileService};

pub use error::ApiError;
pub use frame::{CreatedFrame, IdFrame};
pub use rest::NewProfile;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileService,
    pub bridge: Arc<Bridge>,
}

impl AppState {
    /// Wires a service onto the bridge's publisher.
    pub fn new(store: Arc<dyn crate::profiles::ProfileStore>, bridge: Arc<Bridge>) -> Self {
        Self {
            profiles: ProfileService::new(store, bridge.publisher()),
            bridge,
        }
    }
}

/// Builds the application router. `cors_origin` applies to the SSE route only.
pub fn router(state: AppState, cors_origin: Option<HeaderValue>) -> Router {
    let mut sse: Router<AppState> = Router::new().route("/sse/profiles", get(sse::stream));
    if let Some(origin) = cors_origin {
        sse = sse.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET]),
        );
    }

    Router::new()
        .route("/profiles", get(rest::all).post(rest::create))
        .route("/profiles/{id}", get(rest::by_id))
        .route("/ws/profiles", get(ws::upgrade))
        .merge(sse)
        .with_state(state)
}
