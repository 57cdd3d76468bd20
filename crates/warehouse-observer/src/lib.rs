//! Observer API server for the Warehouse Optimizer.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/round`) streaming every
//!   [`RoundUpdate`](warehouse_types::RoundUpdate) as JSON
//! - **REST endpoints** for reading the round snapshot and score history
//! - **Command endpoints** for starting a round and adjusting stock
//! - **Minimal HTML status page** (`GET /`) showing the countdown, score,
//!   and stock levels
//!
//! # Architecture
//!
//! Every handler goes through the shared
//! [`GameSession`](warehouse_core::session::GameSession), which serializes
//! commands and ticks behind one lock. `WebSocket` clients subscribe to
//! the session's broadcast channel with automatic lag handling.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
