//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin client access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/round` -- `WebSocket` round update stream
/// - `GET /api/round` -- current round snapshot
/// - `GET /api/history` -- score history
/// - `POST /api/round/start` -- start a round
/// - `POST /api/inventory/{category}/adjust` -- adjust stock
///
/// CORS allows any origin so a browser client served from elsewhere can
/// reach the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/round", get(ws::ws_round))
        // Queries
        .route("/api/round", get(handlers::get_round))
        .route("/api/history", get(handlers::get_history))
        // Commands
        .route("/api/round/start", post(handlers::start_round))
        .route(
            "/api/inventory/{category}/adjust",
            post(handlers::adjust_stock),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
