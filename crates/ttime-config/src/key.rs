// Settings keys identifying a rating's configuration.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::WEIGHT_KEY;
use crate::ConfigError;

/// Stable identifier of a rating's entry in the [`SettingsStore`](crate::SettingsStore).
///
/// A key is never empty and never collides with the reserved weight map key.
///
/// # Example
///
/// ```
/// use ttime_config::SettingsKey;
///
/// mod plugins {
///     pub struct FreeDays;
/// }
///
/// let key = SettingsKey::from_type_name::<plugins::FreeDays>().unwrap();
/// assert_eq!(key.as_str(), "FreeDays");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettingsKey(String);

impl SettingsKey {
    /// Creates a key, rejecting blank or reserved names.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid("settings key is empty".to_string()));
        }
        if trimmed == WEIGHT_KEY {
            return Err(ConfigError::Invalid(format!(
                "settings key `{}` is reserved for the weight map",
                WEIGHT_KEY
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Derives a key from the unqualified name of `T`.
    ///
    /// Generic arguments are ignored, so `a::Rating<b::X>` yields `Rating`.
    pub fn from_type_name<T: ?Sized>() -> Result<Self, ConfigError> {
        let type_name = std::any::type_name::<T>();
        let short = short_type_name(type_name);
        Self::new(short).map_err(|_| ConfigError::UnresolvedSettingsKey {
            type_name: type_name.to_string(),
        })
    }

    /// Resolves an explicitly declared key, falling back to the type name of `T`.
    pub fn resolve<T: ?Sized>(declared: Option<&str>) -> Result<Self, ConfigError> {
        match declared {
            Some(name) => Self::new(name).map_err(|_| ConfigError::UnresolvedSettingsKey {
                type_name: std::any::type_name::<T>().to_string(),
            }),
            None => Self::from_type_name::<T>(),
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns the last path segment of a type name, without generic arguments.
pub(crate) fn short_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SettingsKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SettingsKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SettingsKey {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for SettingsKey {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SettingsKey> for String {
    fn from(key: SettingsKey) -> Self {
        key.0
    }
}
