//! The repeating tick task.
//!
//! A [`RoundTicker`] is spawned for exactly one round. Every period it
//! locks the shared engine and calls [`RoundEngine::tick`], and it exits
//! on its own as soon as that round is no longer being played. It also
//! exits when the engine has moved on to a different round, so a ticker
//! left over from an earlier round can never touch a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, warn};
use warehouse_types::RoundId;

use crate::engine::{RoundEngine, TickOutcome};

/// The engine as shared between the ticker and command callers.
pub type SharedEngine = Arc<Mutex<RoundEngine>>;

/// Why a ticker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerExit {
    /// The countdown ran out, or the round was already over.
    RoundEnded,
    /// [`RoundTicker::cancel`] was called.
    Cancelled,
    /// The engine started a different round.
    RoundReplaced,
}

/// Stop flag plus a wakeup for a ticker sleeping between ticks.
#[derive(Debug, Default)]
struct StopSignal {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Handle to a running tick task.
#[derive(Debug)]
pub struct RoundTicker {
    round_id: RoundId,
    signal: Arc<StopSignal>,
    handle: JoinHandle<TickerExit>,
}

impl RoundTicker {
    /// Spawn a task that ticks `round_id` every `period`.
    ///
    /// The first tick fires one full period after spawning.
    pub fn spawn(engine: SharedEngine, round_id: RoundId, period: Duration) -> Self {
        let signal = Arc::new(StopSignal::default());
        let handle = tokio::spawn(run(engine, round_id, period, Arc::clone(&signal)));
        debug!(%round_id, period_ms = period.as_millis(), "Ticker spawned");
        Self {
            round_id,
            signal,
            handle,
        }
    }

    /// Ask the task to stop. It performs no further ticks once this returns.
    pub fn cancel(&self) {
        self.signal.stop();
    }

    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// The round this ticker drives.
    pub const fn round_id(&self) -> RoundId {
        self.round_id
    }

    /// Wait for the task to exit.
    pub async fn join(self) -> TickerExit {
        match self.handle.await {
            Ok(exit) => exit,
            Err(e) => {
                warn!(round_id = %self.round_id, error = %e, "Ticker task failed");
                TickerExit::Cancelled
            }
        }
    }
}

async fn run(
    engine: SharedEngine,
    round_id: RoundId,
    period: Duration,
    signal: Arc<StopSignal>,
) -> TickerExit {
    let period = period.max(Duration::from_millis(1));
    let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let exit = loop {
        tokio::select! {
            biased;
            () = signal.notify.notified() => break TickerExit::Cancelled,
            _ = interval.tick() => {}
        }

        let mut engine = engine.lock().await;
        // Checked under the lock: a cancel that raced the interval wins.
        if signal.is_stopped() {
            break TickerExit::Cancelled;
        }
        if engine.round_id() != round_id {
            break TickerExit::RoundReplaced;
        }
        match engine.tick() {
            TickOutcome::Advanced { .. } => {}
            TickOutcome::Ended { .. } | TickOutcome::Inactive => break TickerExit::RoundEnded,
        }
    };

    debug!(%round_id, ?exit, "Ticker stopped");
    exit
}
