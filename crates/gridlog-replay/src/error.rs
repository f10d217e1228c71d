//! Error types for the replay binary.
//!
//! [`ReplayError`] is the top-level error type that wraps all possible
//! failure modes during startup and replay.

/// Top-level error for the replay binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gridlog_core::config::ConfigError,
    },

    /// Scenario loading or replay failed.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: gridlog_core::scenario::ScenarioError,
    },

    /// The command line was unusable.
    #[error("usage error: {message}")]
    Usage {
        /// What was wrong with the arguments.
        message: String,
    },

    /// The report could not be written as JSON.
    #[error("output error: {source}")]
    Output {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
