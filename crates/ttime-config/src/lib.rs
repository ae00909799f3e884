//! Configuration system for TTime ratings.
//!
//! Two kinds of configuration live here:
//! - [`SettingsStore`], the process-wide key/value settings every rating reads
//!   its `enabled` flag, weight and private options from
//! - [`RatingsConfig`], which controls where rating units are discovered
//!
//! # Examples
//!
//! Load persisted settings from TOML:
//!
//! ```
//! use ttime_config::SettingsStore;
//!
//! let store = SettingsStore::from_toml_str(r#"
//!     [weight]
//!     Gaps = 2.0
//!
//!     [Gaps]
//!     enabled = true
//!     max_gap_minutes = 30
//! "#).unwrap();
//!
//! assert_eq!(store.weight("Gaps").unwrap(), 2.0);
//! assert_eq!(store.weight("FreeDays").unwrap(), 1.0);
//! ```
//!
//! Use default discovery paths when no file is present:
//!
//! ```
//! use ttime_config::RatingsConfig;
//!
//! let config = RatingsConfig::load("ratings.toml").unwrap_or_default();
//! assert_eq!(config.unit_extension, "toml");
//! ```

mod key;
mod store;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ttime_core::TtimeError;

pub use key::SettingsKey;
pub use store::{SettingsStore, Value, WEIGHT_KEY};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("settings key undefined for {type_name}")]
    UnresolvedSettingsKey { type_name: String },

    #[error("settings key `{key}` of {duplicate} is already used by {existing}")]
    DuplicateSettingsKey {
        key: String,
        existing: String,
        duplicate: String,
    },

    #[error("settings for `{key}` are not a table")]
    NotATable { key: String },
}

impl From<ConfigError> for TtimeError {
    fn from(err: ConfigError) -> Self {
        TtimeError::Config(err.to_string())
    }
}

/// Where and how rating units are discovered.
///
/// Candidate directories are, in order: every `relative_dirs` entry resolved
/// against the executable's directory, every `system_dirs` entry, every entry
/// of the `search_path_env` variable joined with `subdirectory`, and finally
/// `extra_dirs`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct RatingsConfig {
    /// Directories relative to the running executable.
    pub relative_dirs: Vec<PathBuf>,

    /// Absolute system-wide installation directories.
    pub system_dirs: Vec<PathBuf>,

    /// Environment variable holding the module search path.
    pub search_path_env: String,

    /// Subdirectory appended to every search path entry.
    pub subdirectory: PathBuf,

    /// Additional directories searched last.
    pub extra_dirs: Vec<PathBuf>,

    /// File extension identifying a rating unit.
    pub unit_extension: String,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            relative_dirs: vec![PathBuf::from("../lib/ttime/ratings")],
            system_dirs: vec![
                PathBuf::from("/usr/lib/ttime/ratings"),
                PathBuf::from("/usr/share/ttime/ratings"),
                PathBuf::from("/usr/local/share/ttime/ratings"),
            ],
            search_path_env: "TTIME_PATH".to_string(),
            subdirectory: PathBuf::from("ttime/ratings"),
            extra_dirs: Vec::new(),
            unit_extension: "toml".to_string(),
        }
    }
}

impl RatingsConfig {
    /// Creates the default discovery configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that searches only `dirs`.
    pub fn with_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            relative_dirs: Vec::new(),
            system_dirs: Vec::new(),
            search_path_env: String::new(),
            extra_dirs: dirs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Adds a directory searched after all others.
    pub fn with_extra_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dirs.push(dir.into());
        self
    }

    /// Returns every candidate directory, whether or not it exists.
    ///
    /// `exe_dir` is the directory of the running executable; relative
    /// directories are skipped when it is unknown. `search_path` is the raw
    /// value of the search path variable.
    pub fn candidate_dirs(&self, exe_dir: Option<&Path>, search_path: Option<&str>) -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        if let Some(exe_dir) = exe_dir {
            dirs.extend(self.relative_dirs.iter().map(|d| exe_dir.join(d)));
        }
        dirs.extend(self.system_dirs.iter().cloned());
        if let Some(search_path) = search_path {
            dirs.extend(
                std::env::split_paths(search_path)
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(|p| p.join(&self.subdirectory)),
            );
        }
        dirs.extend(self.extra_dirs.iter().cloned());

        dirs
    }

    /// Returns the candidate directories for the running process.
    pub fn candidate_dirs_for_process(&self) -> Vec<PathBuf> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let search_path = if self.search_path_env.is_empty() {
            None
        } else {
            std::env::var(&self.search_path_env).ok()
        };
        self.candidate_dirs(exe_dir.as_deref(), search_path.as_deref())
    }
}
