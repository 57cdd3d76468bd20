//! The round engine: lifecycle, stock commands, and per-tick demand.
//!
//! [`RoundEngine`] owns every piece of round state: the clock, the
//! inventory, the scoreboard, this tick's alerts and the high score. All
//! mutation goes through its command methods, and each state change is
//! published on a broadcast channel as a [`RoundUpdate`].
//!
//! Round commands never fail. Commands that only make sense while a round
//! is being played ([`adjust_stock`], [`tick`], [`process_demand`]) are
//! silent no-ops in any other phase.
//!
//! [`adjust_stock`]: RoundEngine::adjust_stock
//! [`tick`]: RoundEngine::tick
//! [`process_demand`]: RoundEngine::process_demand

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use warehouse_types::{
    Alert, AlertKind, Category, Phase, RoundId, RoundSnapshot, RoundUpdate, Score, ScoreAction,
    ScoreHistoryEntry, UpdateReason,
};

use crate::alerts::TickAlerts;
use crate::clock::{ClockError, Countdown, RoundClock};
use crate::config::{ConfigError, GameConfig};
use crate::demand::DemandSource;
use crate::inventory::{DemandOutcome, Inventory, InventoryError, StockMovement};
use crate::scoring::Scoreboard;

/// Buffered updates per subscriber before it starts lagging.
pub const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Errors that can occur when building an engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration failed validation.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The round clock could not be built.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The inventory could not be built.
    #[error("inventory error: {source}")]
    Inventory {
        /// The underlying inventory error.
        #[from]
        source: InventoryError,
    },
}

/// What a call to [`RoundEngine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown advanced and demand was processed.
    Advanced {
        /// Seconds left after this tick.
        remaining: u32,
        /// Whether no category stocked out or overstocked.
        perfect: bool,
    },
    /// The countdown reached zero and the round ended.
    Ended {
        /// Final total of the round.
        final_total: i64,
        /// High score after the round was counted.
        high_score: i64,
    },
    /// No round is being played; nothing changed.
    Inactive,
}

/// Owner of all round state.
pub struct RoundEngine {
    phase: Phase,
    round_id: RoundId,
    revision: u64,
    clock: RoundClock,
    high_score: i64,
    inventory: Inventory,
    scoreboard: Scoreboard,
    alerts: Vec<Alert>,
    demand: Box<dyn DemandSource>,
    updates: broadcast::Sender<RoundUpdate>,
}

impl std::fmt::Debug for RoundEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEngine")
            .field("phase", &self.phase)
            .field("round_id", &self.round_id)
            .field("revision", &self.revision)
            .field("clock", &self.clock)
            .field("high_score", &self.high_score)
            .field("score", self.scoreboard.score())
            .finish_non_exhaustive()
    }
}

impl RoundEngine {
    /// Create an engine in the [`Phase::Intro`] phase.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration does not describe a
    /// playable round.
    pub fn new(config: &GameConfig, demand: Box<dyn DemandSource>) -> Result<Self, EngineError> {
        config.validate()?;
        let clock = RoundClock::new(&config.round)?;
        let inventory = Inventory::from_config(&config.inventory)?;
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        Ok(Self {
            phase: Phase::Intro,
            round_id: RoundId::new(),
            revision: 0,
            clock,
            high_score: 0,
            inventory,
            scoreboard: Scoreboard::new(config.scoring.clone()),
            alerts: Vec::new(),
            demand,
            updates,
        })
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Begin a fresh round from any phase.
    ///
    /// Resets score, history, alerts, clock and inventory, assigns a new
    /// round id and enters [`Phase::Playing`]. The high score is kept.
    pub fn start_game(&mut self) -> RoundId {
        self.scoreboard.reset();
        self.clock.reset();
        self.inventory.reset();
        self.alerts.clear();
        self.round_id = RoundId::new();
        self.phase = Phase::Playing;

        info!(
            round_id = %self.round_id,
            day = self.clock.day(),
            duration_seconds = self.clock.duration_seconds(),
            "Round started"
        );
        self.publish(UpdateReason::RoundStarted);
        self.round_id
    }

    /// Add `amount` (possibly negative) to one category's stock.
    ///
    /// Awards efficiency points when the move changes the distance to
    /// optimal. Returns `false` without touching anything unless a round is
    /// being played.
    pub fn adjust_stock(&mut self, category: Category, amount: i32) -> bool {
        if !self.phase.is_playing() {
            debug!(%category, amount, phase = ?self.phase, "Ignoring adjustment outside play");
            return false;
        }

        let outcome = self.inventory.adjust(category, amount);
        let rules = self.scoreboard.rules();
        let delta = match outcome.movement {
            StockMovement::TowardOptimal => Some(rules.efficiency_gain),
            StockMovement::AwayFromOptimal => Some(rules.efficiency_loss.saturating_neg()),
            StockMovement::Unchanged => None,
        };
        if let Some(delta) = delta {
            self.scoreboard
                .record(ScoreAction::Efficiency, delta, self.clock.day(), Utc::now());
        }

        debug!(
            %category,
            amount,
            previous_stock = outcome.previous_stock,
            stock = outcome.stock,
            efficiency = ?delta,
            "Stock adjusted"
        );
        self.publish(UpdateReason::StockAdjusted { category });
        true
    }

    /// Advance the round by one tick.
    ///
    /// The countdown is checked first. When it expires the round ends and
    /// no demand is processed on that tick; otherwise demand is processed
    /// exactly once.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_playing() {
            return TickOutcome::Inactive;
        }

        match self.clock.countdown() {
            Countdown::Expired => self.end_round(),
            Countdown::Running { remaining } => {
                let perfect = self.run_demand();
                debug!(
                    round_id = %self.round_id,
                    remaining,
                    perfect,
                    total = self.scoreboard.score().total,
                    "Tick"
                );
                self.publish(UpdateReason::Tick);
                TickOutcome::Advanced { remaining, perfect }
            }
        }
    }

    /// Run one demand pass without touching the countdown.
    ///
    /// [`tick`](Self::tick) already does this; the method exists for callers
    /// that drive demand on their own schedule. Returns `None` outside
    /// [`Phase::Playing`], otherwise whether the pass was perfect.
    pub fn process_demand(&mut self) -> Option<bool> {
        if !self.phase.is_playing() {
            return None;
        }
        let perfect = self.run_demand();
        self.publish(UpdateReason::Tick);
        Some(perfect)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn run_demand(&mut self) -> bool {
        let now = Utc::now();
        let day = self.clock.day();
        let rules = self.scoreboard.rules().clone();
        let mut alerts = TickAlerts::new();

        for category in Category::ALL {
            let base_demand = self.inventory.item(category).demand;
            let demand = self.demand.draw(category, base_demand);

            match self.inventory.apply_demand(category, demand) {
                DemandOutcome::Fulfilled { .. } => {
                    self.scoreboard
                        .record(ScoreAction::FulfilledOrder, rules.fulfilled_order, day, now);
                }
                DemandOutcome::Stockout { stock, .. } => {
                    debug!(%category, demand, stock, "Stockout");
                    alerts.raise(AlertKind::Stockout, category);
                    self.scoreboard.record(
                        ScoreAction::Stockout,
                        rules.stockout_penalty.saturating_neg(),
                        day,
                        now,
                    );
                }
            }

            if self.inventory.is_overstocked(category) {
                debug!(%category, stock = self.inventory.item(category).stock, "Overstock");
                alerts.raise(AlertKind::Overstock, category);
                self.scoreboard.record(
                    ScoreAction::Overstock,
                    rules.overstock_penalty.saturating_neg(),
                    day,
                    now,
                );
            }
        }

        let perfect = alerts.is_perfect();
        if perfect {
            self.scoreboard
                .record(ScoreAction::PerfectOrder, rules.perfect_order_bonus, day, now);
        }
        self.alerts = alerts.into_vec();
        perfect
    }

    fn end_round(&mut self) -> TickOutcome {
        self.phase = Phase::Ended;
        let score = self.scoreboard.score();
        let final_total = score.total;
        let previous_high = self.high_score;
        self.high_score = self.high_score.max(final_total);

        info!(
            round_id = %self.round_id,
            final_total,
            efficiency_points = score.efficiency_points,
            stockouts = score.stockout_count,
            perfect_orders = score.perfect_order_count,
            high_score = self.high_score,
            new_high_score = self.high_score > previous_high,
            "Round ended"
        );
        self.publish(UpdateReason::RoundEnded);
        TickOutcome::Ended {
            final_total,
            high_score: self.high_score,
        }
    }

    fn publish(&mut self, reason: UpdateReason) {
        self.revision = self.revision.saturating_add(1);
        let update = RoundUpdate {
            reason,
            snapshot: self.snapshot(),
        };
        let receivers = self.updates.send(update).unwrap_or(0);
        debug!(revision = self.revision, ?reason, receivers, "Published round update");
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Read-only view of the whole round.
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            round_id: self.round_id,
            revision: self.revision,
            phase: self.phase,
            day: self.clock.day(),
            time_remaining_seconds: self.clock.remaining_seconds(),
            high_score: self.high_score,
            score: self.scoreboard.score().clone(),
            inventory: self.inventory.to_map(),
            alerts: self.alerts.clone(),
        }
    }

    /// Every scoring event of the current round, oldest first.
    pub fn history(&self) -> &[ScoreHistoryEntry] {
        self.scoreboard.history()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<RoundUpdate> {
        self.updates.subscribe()
    }

    /// A sender clone, for components that hand out their own subscriptions.
    pub fn update_sender(&self) -> broadcast::Sender<RoundUpdate> {
        self.updates.clone()
    }

    /// Lifecycle phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Identifier of the current (or most recent) round.
    pub const fn round_id(&self) -> RoundId {
        self.round_id
    }

    /// Monotonic change counter.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Best final total seen by this engine.
    pub const fn high_score(&self) -> i64 {
        self.high_score
    }

    /// Current score.
    pub const fn score(&self) -> &Score {
        self.scoreboard.score()
    }

    /// Current stock levels.
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Alerts raised by the latest tick.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// The round clock.
    pub const fn clock(&self) -> &RoundClock {
        &self.clock
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::demand::FixedDemand;

    fn make_engine() -> RoundEngine {
        RoundEngine::new(&GameConfig::default(), Box::new(FixedDemand::new(0))).unwrap()
    }

    #[test]
    fn new_engine_waits_in_intro() {
        let engine = make_engine();
        assert_eq!(engine.phase(), Phase::Intro);
        assert_eq!(engine.revision(), 0);
        assert_eq!(engine.snapshot().time_remaining_seconds, 30);
    }

    #[test]
    fn commands_before_start_are_ignored() {
        let mut engine = make_engine();
        assert!(!engine.adjust_stock(Category::Electronics, 10));
        assert_eq!(engine.tick(), TickOutcome::Inactive);
        assert_eq!(engine.process_demand(), None);
        assert_eq!(engine.revision(), 0);
        assert_eq!(engine.inventory().item(Category::Electronics).stock, 50);
    }

    #[test]
    fn start_assigns_new_round_id() {
        let mut engine = make_engine();
        let before = engine.round_id();
        let started = engine.start_game();
        assert_ne!(before, started);
        assert_eq!(engine.round_id(), started);
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn unchanged_distance_records_nothing() {
        let mut engine = make_engine();
        let _ = engine.start_game();
        let _ = engine.adjust_stock(Category::Apparel, -60);
        let history_len = engine.history().len();
        // Already at the floor: clamped no-op.
        assert!(engine.adjust_stock(Category::Apparel, -5));
        assert_eq!(engine.history().len(), history_len);
    }

    #[test]
    fn process_demand_skips_countdown() {
        let mut engine = make_engine();
        let _ = engine.start_game();
        assert_eq!(engine.process_demand(), Some(true));
        assert_eq!(engine.clock().remaining_seconds(), 30);
        assert_eq!(engine.score().total, 95);
    }

    #[test]
    fn every_change_bumps_revision() {
        let mut engine = make_engine();
        let _ = engine.start_game();
        let _ = engine.adjust_stock(Category::Accessories, 3);
        let _ = engine.tick();
        assert_eq!(engine.revision(), 3);
        assert_eq!(engine.snapshot().revision, 3);
    }

    #[test]
    fn published_updates_carry_reason() {
        let mut engine = make_engine();
        let mut rx = engine.subscribe();
        let _ = engine.start_game();
        let _ = engine.adjust_stock(Category::Apparel, 1);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.reason, UpdateReason::RoundStarted);
        let second = rx.try_recv().unwrap();
        assert_eq!(
            second.reason,
            UpdateReason::StockAdjusted {
                category: Category::Apparel
            }
        );
        assert_eq!(second.snapshot.inventory[&Category::Apparel].stock, 51);
    }
}
