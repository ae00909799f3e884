//! Error types for TTime

use thiserror::Error;

/// Main error type for TTime operations
#[derive(Debug, Error)]
pub enum TtimeError {
    /// Error in settings or discovery configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rating unit could not be loaded
    #[error("Plugin load error: {0}")]
    Load(String),

    /// Error during schedule scoring
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// Schedule data violates the timetable model
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}

/// Result type alias for TTime operations
pub type Result<T> = std::result::Result<T, TtimeError>;
