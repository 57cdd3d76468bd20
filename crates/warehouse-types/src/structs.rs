//! Round state structs shared between the engine and its observers.
//!
//! Everything here is a plain data carrier. Mutation rules live in
//! `warehouse-core`; these types only describe what a snapshot looks like
//! on the wire.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AlertKind, Category, Phase, ScoreAction};
use crate::ids::RoundId;

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Stock state for a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryItem {
    /// Units on hand, always within the configured stock bounds.
    pub stock: u32,
    /// Baseline demand drawn against each tick.
    pub demand: u32,
    /// Target stock level.
    pub optimal: u32,
    /// True when stock is low relative to demand or above the overstock threshold.
    pub warning: bool,
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// The most recent scoring event, kept for transient display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LastAction {
    /// Which kind of event it was.
    pub action: ScoreAction,
    /// Value passed with the event (informational for fixed-value actions).
    pub value: i64,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

impl LastAction {
    /// Sign-prefixed value followed by the action name, e.g. `+15 FULFILLED ORDER`.
    pub fn label(&self) -> String {
        let sign = if self.value >= 0 { "+" } else { "" };
        format!("{sign}{} {}", self.value, self.action.display_name())
    }
}

/// Cumulative score for the current round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Score {
    /// Running total. Floored at zero only when a stockout is applied.
    pub total: i64,
    /// Sum of all efficiency deltas.
    pub efficiency_points: i64,
    /// Number of category stockouts this round.
    pub stockout_count: u32,
    /// Number of ticks with no stockout and no overstock.
    pub perfect_order_count: u32,
    /// The most recent scoring event, if any.
    pub last_action: Option<LastAction>,
}

/// One audit-trail entry in the round's score history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScoreHistoryEntry {
    /// Day counter at the time of the event.
    pub day: u32,
    /// Which kind of event it was.
    pub action: ScoreAction,
    /// Value passed with the event.
    pub value: i64,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// A stockout or overstock raised during the latest tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Alert {
    /// Stockout or overstock.
    pub kind: AlertKind,
    /// The affected category.
    pub category: Category,
    /// Display text, e.g. `Stockout: electronics`.
    pub message: String,
}

impl Alert {
    /// Build an alert with its canonical message.
    pub fn new(kind: AlertKind, category: Category) -> Self {
        Self {
            kind,
            category,
            message: format!("{}: {category}", kind.prefix()),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots and updates
// ---------------------------------------------------------------------------

/// Read-only view of the entire round, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoundSnapshot {
    /// Identifier of the current round.
    pub round_id: RoundId,
    /// Monotonic change counter for this engine.
    pub revision: u64,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Day counter.
    pub day: u32,
    /// Seconds left on the countdown.
    pub time_remaining_seconds: u32,
    /// Best final total seen during this process lifetime.
    pub high_score: i64,
    /// Current score.
    pub score: Score,
    /// Stock per category.
    pub inventory: BTreeMap<Category, InventoryItem>,
    /// Alerts raised by the latest tick.
    pub alerts: Vec<Alert>,
}

/// Why a [`RoundUpdate`] was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum UpdateReason {
    /// `start_game` reset the round.
    RoundStarted,
    /// A stock adjustment changed one category.
    StockAdjusted {
        /// The adjusted category.
        category: Category,
    },
    /// A countdown tick processed demand.
    Tick,
    /// The countdown reached zero.
    RoundEnded,
}

/// Change notification pushed to subscribers after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoundUpdate {
    /// What caused the change.
    pub reason: UpdateReason,
    /// State after the change.
    pub snapshot: RoundSnapshot,
}
