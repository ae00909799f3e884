//! Error types for the rating subsystem.

use std::path::PathBuf;

use thiserror::Error;
use ttime_config::{ConfigError, SettingsKey};
use ttime_core::TtimeError;

/// Error raised by rating code.
#[derive(Debug, Error)]
pub enum RatingError {
    /// The rating could not be constructed.
    #[error("construction failed: {0}")]
    Construction(String),

    /// The score could not be computed.
    #[error("computation failed: {0}")]
    Computation(String),

    /// The stored settings do not match what the rating expects.
    #[error("invalid settings for `{key}`: {reason}")]
    InvalidSettings { key: String, reason: String },

    /// The rating does not implement the requested menu action.
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A registered rating type failed its zero-argument construction.
#[derive(Debug, Error)]
#[error("failed to construct rating `{key}` ({type_name}): {source}")]
pub struct ConstructionError {
    pub key: SettingsKey,
    pub type_name: &'static str,
    pub source: RatingError,
}

/// A rating unit could not be loaded during discovery.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read rating unit {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed rating unit {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("rating unit `{unit}` names unknown module `{module}`")]
    UnknownModule { unit: String, module: String },

    #[error("rating unit `{unit}` failed to register: {source}")]
    Registration { unit: String, source: ConfigError },
}

/// Error raised while scoring a schedule or dispatching a rating action.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("rating `{key}` failed: {source}")]
    Rating { key: SettingsKey, source: RatingError },

    #[error("settings of rating `{key}` are unusable: {source}")]
    Settings { key: SettingsKey, source: ConfigError },

    #[error("no live rating with settings key `{0}`")]
    UnknownRating(String),

    #[error("rating `{key}` declares no action `{action}`")]
    UnknownAction { key: String, action: String },

    #[error("action `{action}` of rating `{key}` requires a selected event")]
    EventRequired { key: String, action: String },
}

impl From<LoadError> for TtimeError {
    fn from(err: LoadError) -> Self {
        TtimeError::Load(err.to_string())
    }
}

impl From<ScoringError> for TtimeError {
    fn from(err: ScoringError) -> Self {
        TtimeError::Scoring(err.to_string())
    }
}
