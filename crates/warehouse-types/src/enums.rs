//! Enumeration types for the Warehouse Optimizer.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One of the fixed inventory classes held by the warehouse.
///
/// The set is closed: every round tracks exactly these three categories,
/// and demand is applied to them in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Category {
    /// Consumer electronics (base demand 10).
    Electronics,
    /// Clothing (base demand 8).
    Apparel,
    /// Small accessories (base demand 15).
    Accessories,
}

impl Category {
    /// Every category, in the order demand is processed.
    pub const ALL: [Self; 3] = [Self::Electronics, Self::Apparel, Self::Accessories];

    /// Lowercase name used in alerts, config keys and URLs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Apparel => "apparel",
            Self::Accessories => "accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the fixed categories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {name}")]
pub struct UnknownCategory {
    /// The rejected input.
    pub name: String,
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory { name: s.to_owned() })
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Phase {
    /// Waiting for the player to start a round.
    #[default]
    Intro,
    /// The countdown is running and commands are accepted.
    Playing,
    /// The countdown reached zero. The round is frozen.
    Ended,
}

impl Phase {
    /// Whether commands and ticks may mutate the round.
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

// ---------------------------------------------------------------------------
// ScoreAction
// ---------------------------------------------------------------------------

/// A scoring event kind, as recorded in the score history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ScoreAction {
    /// A stock adjustment moved a category toward or away from optimal.
    Efficiency,
    /// A category could not cover its demand draw this tick.
    Stockout,
    /// No category stocked out or overstocked this tick.
    PerfectOrder,
    /// A category covered its demand draw this tick.
    FulfilledOrder,
    /// A category sat above its overstock threshold after demand.
    Overstock,
}

impl ScoreAction {
    /// Wire name of the action (`FULFILLED_ORDER`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Efficiency => "EFFICIENCY",
            Self::Stockout => "STOCKOUT",
            Self::PerfectOrder => "PERFECT_ORDER",
            Self::FulfilledOrder => "FULFILLED_ORDER",
            Self::Overstock => "OVERSTOCK",
        }
    }

    /// Human-readable name: the wire name with its first underscore
    /// replaced by a space.
    pub fn display_name(self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

impl fmt::Display for ScoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AlertKind
// ---------------------------------------------------------------------------

/// The two conditions that raise a per-tick alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AlertKind {
    /// Stock could not cover the tick's demand draw.
    Stockout,
    /// Stock exceeded the overstock threshold after demand.
    Overstock,
}

impl AlertKind {
    /// Capitalized prefix used in alert messages.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Stockout => "Stockout",
            Self::Overstock => "Overstock",
        }
    }
}
