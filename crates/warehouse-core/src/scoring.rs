//! The score mutator and the round's score history.
//!
//! Every scoring event in a round goes through [`Scoreboard::record`]. The
//! event kind decides how the running total changes:
//!
//! | Action           | Effect                                                  |
//! |------------------|---------------------------------------------------------|
//! | `EFFICIENCY`     | `efficiency_points += value`, `total += value`          |
//! | `STOCKOUT`       | `stockout_count += 1`, `total = max(0, total - penalty)` |
//! | `PERFECT_ORDER`  | `perfect_order_count += 1`, `total += bonus`            |
//! | anything else    | `total += value`                                        |
//!
//! For `STOCKOUT` and `PERFECT_ORDER` the passed value only feeds the
//! last-action display and the history; the configured amount is applied.
//! Only the stockout path floors the total at zero.

use chrono::{DateTime, Utc};
use warehouse_types::{LastAction, Score, ScoreAction, ScoreHistoryEntry};

use crate::config::ScoringConfig;

/// Running score plus its append-only audit trail.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    score: Score,
    history: Vec<ScoreHistoryEntry>,
    rules: ScoringConfig,
}

impl Scoreboard {
    /// Create an empty scoreboard using the given point values.
    pub fn new(rules: ScoringConfig) -> Self {
        Self {
            score: Score::default(),
            history: Vec::new(),
            rules,
        }
    }

    /// Zero the score and clear the history.
    pub fn reset(&mut self) {
        self.score = Score::default();
        self.history.clear();
    }

    /// Apply one scoring event.
    pub fn record(&mut self, action: ScoreAction, value: i64, day: u32, now: DateTime<Utc>) {
        let score = &mut self.score;
        match action {
            ScoreAction::Efficiency => {
                score.efficiency_points = score.efficiency_points.saturating_add(value);
                score.total = score.total.saturating_add(value);
            }
            ScoreAction::Stockout => {
                score.stockout_count = score.stockout_count.saturating_add(1);
                score.total = score
                    .total
                    .saturating_sub(self.rules.stockout_penalty)
                    .max(0);
            }
            ScoreAction::PerfectOrder => {
                score.perfect_order_count = score.perfect_order_count.saturating_add(1);
                score.total = score.total.saturating_add(self.rules.perfect_order_bonus);
            }
            ScoreAction::FulfilledOrder | ScoreAction::Overstock => {
                score.total = score.total.saturating_add(value);
            }
        }

        score.last_action = Some(LastAction {
            action,
            value,
            timestamp: now,
        });
        self.history.push(ScoreHistoryEntry {
            day,
            action,
            value,
            timestamp: now,
        });
    }

    /// Current score.
    pub const fn score(&self) -> &Score {
        &self.score
    }

    /// Every event recorded this round, oldest first.
    pub fn history(&self) -> &[ScoreHistoryEntry] {
        &self.history
    }

    /// Point values in force.
    pub const fn rules(&self) -> &ScoringConfig {
        &self.rules
    }
}
