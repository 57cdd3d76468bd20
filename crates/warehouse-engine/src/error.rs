//! Error types for the engine binary.
//!
//! [`AppError`] is the top-level error type that wraps every failure mode
//! during startup and serving.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: warehouse_core::config::ConfigError,
    },

    /// The round engine could not be built.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: warehouse_core::engine::EngineError,
    },

    /// The observer API server failed.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: warehouse_observer::ServerError,
    },
}
