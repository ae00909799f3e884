// Process-wide settings store shared by all ratings.

use std::fmt::Debug;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use toml::Table;

use crate::ConfigError;

/// Structured settings value.
pub use toml::Value;

/// Key of the table holding every rating's weight.
pub const WEIGHT_KEY: &str = "weight";

/// Key/value settings shared by every rating of the process.
///
/// The store is created once by the application and handed to the rating
/// registry as an `Arc<SettingsStore>`. Every access takes the internal lock,
/// so reads and writes are sequentially consistent.
#[derive(Default)]
pub struct SettingsStore {
    values: RwLock<Table>,
}

impl Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("count", &self.read().len())
            .finish()
    }
}

impl SettingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `table`.
    pub fn from_table(table: Table) -> Self {
        Self {
            values: RwLock::new(table),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.write().insert(key.into(), value);
    }

    /// Removes the value stored under `key`.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().remove(key)
    }

    /// Returns true if a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Returns the value under `key`, storing `defaults()` first if absent.
    ///
    /// Defaults are applied at most once: later calls return whatever is
    /// stored, including changes made since.
    pub fn get_or_init(&self, key: &str, defaults: impl FnOnce() -> Value) -> Value {
        if let Some(value) = self.read().get(key) {
            return value.clone();
        }
        self.write()
            .entry(key.to_string())
            .or_insert_with(defaults)
            .clone()
    }

    /// Applies `f` to the value under `key`, storing `defaults()` first if absent.
    pub fn update<R>(
        &self,
        key: &str,
        defaults: impl FnOnce() -> Value,
        f: impl FnOnce(&mut Value) -> R,
    ) -> R {
        let mut values = self.write();
        let value = values.entry(key.to_string()).or_insert_with(defaults);
        f(value)
    }

    /// Returns the weight of `key`, or 1 if the weight map has no entry.
    ///
    /// # Errors
    ///
    /// Returns error if the weight map or the entry has the wrong type.
    pub fn weight(&self, key: &str) -> Result<f64, ConfigError> {
        let values = self.read();
        let Some(weights) = values.get(WEIGHT_KEY) else {
            return Ok(1.0);
        };
        let weights = weights.as_table().ok_or_else(|| ConfigError::NotATable {
            key: WEIGHT_KEY.to_string(),
        })?;
        match weights.get(key) {
            None => Ok(1.0),
            Some(value) => as_number(value).ok_or_else(|| {
                ConfigError::Invalid(format!("weight of `{}` is not a number: {}", key, value))
            }),
        }
    }

    /// Sets the weight of `key` in the weight map.
    pub fn set_weight(&self, key: &str, weight: f64) -> Result<(), ConfigError> {
        let mut values = self.write();
        let weights = values
            .entry(WEIGHT_KEY.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        let weights = weights.as_table_mut().ok_or_else(|| ConfigError::NotATable {
            key: WEIGHT_KEY.to_string(),
        })?;
        weights.insert(key.to_string(), Value::Float(weight));
        Ok(())
    }

    /// Returns a copy of every stored value.
    pub fn snapshot(&self) -> Table {
        self.read().clone()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Parses a store from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_table(toml::from_str(s)?))
    }

    /// Parses a store from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_table(serde_yaml::from_str(s)?))
    }

    /// Serializes the store as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(&*self.read())?)
    }

    /// Serializes the store as YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(&*self.read())?)
    }

    /// Loads a store from a file. `.yaml`/`.yml` files are read as YAML,
    /// anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        if is_yaml(path) {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Writes the store to a file, choosing the format like [`load`](Self::load).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = if is_yaml(path) {
            self.to_yaml_string()?
        } else {
            self.to_toml_string()?
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}
