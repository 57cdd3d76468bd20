//! Round engine binary for the Warehouse Optimizer.
//!
//! This is the main entry point that wires together configuration, the
//! demand source, the game session and the observer API. Rounds are
//! started through `POST /api/round/start` (or at boot when
//! `round.autostart` is set) and tick in the background until the
//! countdown runs out.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `warehouse-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the demand source and the game session
//! 4. Start the round feed logger
//! 5. Optionally start the first round
//! 6. Serve the observer API until `Ctrl-C`
//! 7. Stop the active ticker and log the session summary

mod error;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use warehouse_core::config::{ConfigError, GameConfig};
use warehouse_core::demand::SeededDemand;
use warehouse_core::session::GameSession;
use warehouse_observer::{AppState, ServerConfig};
use warehouse_types::{RoundUpdate, UpdateReason};

use crate::error::AppError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "warehouse-config.yaml";

/// Application entry point for the round engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the engine cannot be
/// built, or the observer server fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration (logged once tracing is up).
    let loaded = load_config();

    // 2. Initialize structured logging. RUST_LOG wins over the config file.
    let default_level = loaded
        .as_ref()
        .map_or("info", |config| config.logging.level.as_str());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .init();

    info!("warehouse-engine starting");
    let config = loaded?;
    info!(
        duration_seconds = config.round.duration_seconds,
        tick_interval_ms = config.round.tick_interval_ms,
        seed = ?config.demand.seed,
        variance = config.demand.variance,
        "Configuration loaded"
    );

    // 3. Build the session.
    let demand = SeededDemand::from_config(&config.demand);
    let session = Arc::new(GameSession::from_config(&config, Box::new(demand))?);
    info!("Game session ready");

    // 4. Log the round feed.
    let feed = tokio::spawn(log_round_feed(session.subscribe()));

    // 5. Autostart.
    if config.round.autostart {
        let snapshot = session.start_game().await;
        info!(round_id = %snapshot.round_id, "Autostarted first round");
    }

    // 6. Serve the observer API.
    let server_config = ServerConfig::from(&config.observer);
    let app_state = Arc::new(AppState::new(Arc::clone(&session)));
    let served = warehouse_observer::start_server(&server_config, app_state, shutdown_signal()).await;

    // 7. Shut down.
    let ticker_exit = session.stop().await;
    feed.abort();
    let snapshot = session.snapshot().await;
    info!(
        phase = ?snapshot.phase,
        high_score = snapshot.high_score,
        ticker_exit = ?ticker_exit,
        "warehouse-engine shutdown complete"
    );

    served?;
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], falling back to defaults when
/// the file does not exist.
fn load_config() -> Result<GameConfig, ConfigError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        GameConfig::from_file(config_path)
    } else {
        let mut config = GameConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

/// Resolve when the process receives `Ctrl-C`.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
    info!("Shutdown signal received");
}

/// Log each scoring event as it happens, using its display label.
async fn log_round_feed(mut rx: broadcast::Receiver<RoundUpdate>) {
    loop {
        match rx.recv().await {
            Ok(update) => {
                let snapshot = &update.snapshot;
                match update.reason {
                    UpdateReason::StockAdjusted { .. } | UpdateReason::Tick => {
                        if let Some(last) = &snapshot.score.last_action {
                            debug!(
                                round_id = %snapshot.round_id,
                                time_remaining = snapshot.time_remaining_seconds,
                                total = snapshot.score.total,
                                alerts = snapshot.alerts.len(),
                                "{}",
                                last.label()
                            );
                        }
                    }
                    UpdateReason::RoundStarted | UpdateReason::RoundEnded => {}
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "Round feed lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}
