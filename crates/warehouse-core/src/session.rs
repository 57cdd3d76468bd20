//! A playable session: the shared engine plus the ticker for its round.
//!
//! [`GameSession`] is the single entry point for everything outside this
//! crate. It serializes commands and ticks through one async mutex around
//! the [`RoundEngine`], and it owns the lifecycle of the [`RoundTicker`]:
//! starting a round cancels the previous ticker and spawns a new one bound
//! to the new round.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tokio::time::Duration;
use tracing::info;
use warehouse_types::{Category, RoundSnapshot, RoundUpdate, ScoreHistoryEntry};

use crate::config::GameConfig;
use crate::demand::DemandSource;
use crate::engine::{EngineError, RoundEngine};
use crate::ticker::{RoundTicker, SharedEngine, TickerExit};

/// Result of a phase-gated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Whether the command changed anything.
    pub applied: bool,
    /// State after the command.
    pub snapshot: RoundSnapshot,
}

/// Shared engine, its update channel, and the active ticker.
#[derive(Debug)]
pub struct GameSession {
    engine: SharedEngine,
    updates: broadcast::Sender<RoundUpdate>,
    ticker: Mutex<Option<RoundTicker>>,
    tick_period: Duration,
}

impl GameSession {
    /// Wrap an engine. Rounds tick every `tick_period` once started.
    pub fn new(engine: RoundEngine, tick_period: Duration) -> Self {
        let updates = engine.update_sender();
        Self {
            engine: Arc::new(Mutex::new(engine)),
            updates,
            ticker: Mutex::new(None),
            tick_period,
        }
    }

    /// Build an engine from configuration and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is not playable.
    pub fn from_config(
        config: &GameConfig,
        demand: Box<dyn DemandSource>,
    ) -> Result<Self, EngineError> {
        let engine = RoundEngine::new(config, demand)?;
        Ok(Self::new(
            engine,
            Duration::from_millis(config.round.tick_interval_ms),
        ))
    }

    /// Start a new round and its ticker, replacing any round in progress.
    pub async fn start_game(&self) -> RoundSnapshot {
        let mut slot = self.ticker.lock().await;
        if let Some(previous) = slot.take() {
            previous.cancel();
        }

        let mut engine = self.engine.lock().await;
        let round_id = engine.start_game();
        let snapshot = engine.snapshot();
        drop(engine);

        *slot = Some(RoundTicker::spawn(
            Arc::clone(&self.engine),
            round_id,
            self.tick_period,
        ));
        snapshot
    }

    /// Adjust one category's stock. Not applied outside play.
    pub async fn adjust_stock(&self, category: Category, amount: i32) -> CommandOutcome {
        let mut engine = self.engine.lock().await;
        let applied = engine.adjust_stock(category, amount);
        CommandOutcome {
            applied,
            snapshot: engine.snapshot(),
        }
    }

    /// Current state of the round.
    pub async fn snapshot(&self) -> RoundSnapshot {
        self.engine.lock().await.snapshot()
    }

    /// Score history of the current round.
    pub async fn history(&self) -> Vec<ScoreHistoryEntry> {
        self.engine.lock().await.history().to_vec()
    }

    /// Subscribe to every state change.
    pub fn subscribe(&self) -> broadcast::Receiver<RoundUpdate> {
        self.updates.subscribe()
    }

    /// The shared engine, for callers that need direct access.
    pub const fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// Cancel the active ticker, if any, and wait for it to exit.
    pub async fn stop(&self) -> Option<TickerExit> {
        let ticker = self.ticker.lock().await.take()?;
        if !ticker.is_finished() {
            ticker.cancel();
        }
        let exit = ticker.join().await;
        info!(?exit, "Session stopped");
        Some(exit)
    }
}
