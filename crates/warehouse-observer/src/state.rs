//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the game session that every handler reads from and
//! sends commands to.

use std::sync::Arc;

use tokio::sync::broadcast;
use warehouse_core::session::GameSession;
use warehouse_types::RoundUpdate;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The session owning the round engine and its ticker.
    pub session: Arc<GameSession>,
}

impl AppState {
    /// Create application state around a session.
    pub const fn new(session: Arc<GameSession>) -> Self {
        Self { session }
    }

    /// Subscribe to round updates.
    ///
    /// Returns a receiver that yields a [`RoundUpdate`] for every state
    /// change the engine publishes.
    pub fn subscribe(&self) -> broadcast::Receiver<RoundUpdate> {
        self.session.subscribe()
    }
}
