//! Core error types for rutina-core.
//!
//! Persistence failures never cross the timer/state-machine boundary; they
//! stay inside the reporter and are surfaced as warning events instead.

use thiserror::Error;

/// Core error type for rutina-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Plan-related errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reporting/transport errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in session plan data.
#[derive(Error, Debug)]
pub enum PlanError {
    /// A plan must contain at least one exercise
    #[error("Session plan contains no exercises")]
    Empty,

    /// Every exercise needs at least one series
    #[error("Exercise '{name}' has a target of zero series")]
    ZeroSeries { name: String },

    /// Exercise name must be non-empty
    #[error("Exercise at position {order} has an empty name")]
    UnnamedExercise { order: usize },
}

/// Errors in engine configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse a configuration file
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors from the progress-report transport.
///
/// These never abort a session; the reporter logs them and emits a
/// [`crate::Event::ReportFailed`] warning.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Base URL for the backend could not be parsed or joined
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP request itself failed (connect, timeout, body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Backend rejected report: HTTP {status}")]
    Rejected { status: u16 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
