//! Shared type definitions for the Warehouse Optimizer.
//!
//! This crate is the single source of truth for every type that crosses the
//! boundary between the round engine and the presentation layer. Types
//! defined here flow downstream to `TypeScript` via `ts-rs` for the browser
//! client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers (round identity)
//! - [`enums`] -- Categories, phases, score actions, alert kinds
//! - [`structs`] -- Inventory, score, history, alerts, snapshots, updates

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AlertKind, Category, Phase, ScoreAction, UnknownCategory};
pub use ids::RoundId;
pub use structs::{
    Alert, InventoryItem, LastAction, RoundSnapshot, RoundUpdate, Score, ScoreHistoryEntry,
    UpdateReason,
};
