//! Configuration loading and typed config structures for the Warehouse Optimizer.
//!
//! The canonical configuration lives in `warehouse-config.yaml` in the
//! working directory. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads and validates the
//! file. Every field has a default matching the classic 30-second round.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;
use warehouse_types::Category;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an unplayable round.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `warehouse-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Countdown and tick timing.
    pub round: RoundConfig,

    /// Stock bounds, thresholds, and per-category baselines.
    pub inventory: InventoryConfig,

    /// Demand randomization.
    pub demand: DemandConfig,

    /// Point values for every scoring event.
    pub scoring: ScoringConfig,

    /// Observer HTTP server settings.
    pub observer: ObserverConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `WAREHOUSE_SEED` overrides `demand.seed`
    /// - `WAREHOUSE_OBSERVER_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse_yaml(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Unlike [`from_file`](Self::from_file) this does not consult the
    /// environment, so results are reproducible in tests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override selected values with environment variables when set.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("WAREHOUSE_SEED") {
            match val.parse::<u64>() {
                Ok(seed) => self.demand.seed = Some(seed),
                Err(e) => warn!(value = %val, error = %e, "ignoring invalid WAREHOUSE_SEED"),
            }
        }
        if let Ok(val) = std::env::var("WAREHOUSE_OBSERVER_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.observer.port = port,
                Err(e) => {
                    warn!(value = %val, error = %e, "ignoring invalid WAREHOUSE_OBSERVER_PORT");
                }
            }
        }
    }

    /// Check that the configuration describes a playable round.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round.duration_seconds == 0 {
            return Err(invalid("round.duration_seconds must be at least 1"));
        }
        if self.round.tick_interval_ms == 0 {
            return Err(invalid("round.tick_interval_ms must be at least 1"));
        }
        let inv = &self.inventory;
        if inv.min_stock > inv.max_stock {
            return Err(invalid(format!(
                "inventory.min_stock ({}) exceeds inventory.max_stock ({})",
                inv.min_stock, inv.max_stock
            )));
        }
        for category in Category::ALL {
            let Some(cfg) = inv.categories.get(&category) else {
                return Err(invalid(format!("inventory.categories.{category} is missing")));
            };
            if cfg.starting_stock < inv.min_stock || cfg.starting_stock > inv.max_stock {
                return Err(invalid(format!(
                    "inventory.categories.{category}.starting_stock ({}) is outside [{}, {}]",
                    cfg.starting_stock, inv.min_stock, inv.max_stock
                )));
            }
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Countdown and tick timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoundConfig {
    /// Length of a round in ticks (one tick per second by default).
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Value of the day counter at round start.
    #[serde(default = "default_starting_day")]
    pub starting_day: u32,

    /// Start a round as soon as the engine binary boots.
    #[serde(default)]
    pub autostart: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
            tick_interval_ms: default_tick_interval_ms(),
            starting_day: default_starting_day(),
            autostart: false,
        }
    }
}

/// Baseline for one inventory category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CategoryConfig {
    /// Stock at round start.
    #[serde(default = "default_starting_stock")]
    pub starting_stock: u32,

    /// Baseline demand per tick, before the random offset.
    pub base_demand: u32,

    /// Target stock level.
    #[serde(default = "default_optimal")]
    pub optimal: u32,
}

/// Stock bounds, thresholds, and per-category baselines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryConfig {
    /// Lowest stock a category can hold.
    #[serde(default)]
    pub min_stock: u32,

    /// Highest stock a category can hold.
    #[serde(default = "default_max_stock")]
    pub max_stock: u32,

    /// A category warns when stock drops below `demand * multiplier`.
    #[serde(default = "default_warning_demand_multiplier")]
    pub warning_demand_multiplier: u32,

    /// Overstock threshold as a percentage of optimal (150 = 1.5x).
    #[serde(default = "default_overstock_percent")]
    pub overstock_percent: u32,

    /// Per-category baselines. All three categories must be present.
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<Category, CategoryConfig>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            min_stock: 0,
            max_stock: default_max_stock(),
            warning_demand_multiplier: default_warning_demand_multiplier(),
            overstock_percent: default_overstock_percent(),
            categories: default_categories(),
        }
    }
}

/// Demand randomization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemandConfig {
    /// Seed for the demand generator. Drawn from OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Maximum absolute offset applied to base demand each tick.
    #[serde(default = "default_variance")]
    pub variance: u32,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            seed: None,
            variance: default_variance(),
        }
    }
}

/// Point values for every scoring event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoringConfig {
    /// Awarded when an adjustment moves stock toward optimal.
    #[serde(default = "default_efficiency_gain")]
    pub efficiency_gain: i64,

    /// Deducted when an adjustment moves stock away from optimal.
    #[serde(default = "default_efficiency_loss")]
    pub efficiency_loss: i64,

    /// Awarded per category that covers its demand.
    #[serde(default = "default_fulfilled_order")]
    pub fulfilled_order: i64,

    /// Deducted per stockout. The total never drops below zero on this path.
    #[serde(default = "default_stockout_penalty")]
    pub stockout_penalty: i64,

    /// Deducted per overstocked category.
    #[serde(default = "default_overstock_penalty")]
    pub overstock_penalty: i64,

    /// Awarded for a tick without stockouts or overstock.
    #[serde(default = "default_perfect_order_bonus")]
    pub perfect_order_bonus: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            efficiency_gain: default_efficiency_gain(),
            efficiency_loss: default_efficiency_loss(),
            fulfilled_order: default_fulfilled_order(),
            stockout_penalty: default_stockout_penalty(),
            overstock_penalty: default_overstock_penalty(),
            perfect_order_bonus: default_perfect_order_bonus(),
        }
    }
}

/// Observer HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Bind address.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_duration_seconds() -> u32 {
    30
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_starting_day() -> u32 {
    1
}

const fn default_starting_stock() -> u32 {
    50
}

const fn default_optimal() -> u32 {
    50
}

const fn default_max_stock() -> u32 {
    100
}

const fn default_warning_demand_multiplier() -> u32 {
    2
}

const fn default_overstock_percent() -> u32 {
    150
}

fn default_categories() -> BTreeMap<Category, CategoryConfig> {
    let baseline = |base_demand| CategoryConfig {
        starting_stock: default_starting_stock(),
        base_demand,
        optimal: default_optimal(),
    };
    let mut m = BTreeMap::new();
    m.insert(Category::Electronics, baseline(10));
    m.insert(Category::Apparel, baseline(8));
    m.insert(Category::Accessories, baseline(15));
    m
}

const fn default_variance() -> u32 {
    2
}

const fn default_efficiency_gain() -> i64 {
    10
}

const fn default_efficiency_loss() -> i64 {
    5
}

const fn default_fulfilled_order() -> i64 {
    15
}

const fn default_stockout_penalty() -> i64 {
    25
}

const fn default_overstock_penalty() -> i64 {
    10
}

const fn default_perfect_order_bonus() -> i64 {
    50
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}
