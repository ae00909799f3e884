//! Constructed ratings bound to the settings store.

use std::fmt::Debug;
use std::sync::Arc;

use toml::Table;
use ttime_config::{ConfigError, SettingsKey, SettingsStore, Value};
use ttime_core::{Course, Event, Schedule};

use crate::error::RatingError;
use crate::menu::MenuItem;
use crate::rating::{ActionContext, Rating, RatingContext};
use crate::registry::RatingDescriptor;

/// Name of the per-rating flag switching it on or off.
pub const ENABLED_SETTING: &str = "enabled";

/// A constructed rating together with its identity and settings access.
///
/// One instance exists per registered type; it is reused across scoring calls.
pub struct RatingInstance {
    key: SettingsKey,
    type_name: &'static str,
    default_settings: fn() -> Option<Value>,
    menu_items: Vec<MenuItem>,
    store: Arc<SettingsStore>,
    rating: Box<dyn Rating>,
}

impl Debug for RatingInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingInstance")
            .field("key", &self.key)
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl RatingInstance {
    pub(crate) fn new(
        descriptor: &RatingDescriptor,
        store: Arc<SettingsStore>,
        rating: Box<dyn Rating>,
    ) -> Self {
        Self {
            key: descriptor.settings_key.clone(),
            type_name: descriptor.type_name,
            default_settings: descriptor.default_settings_fn(),
            menu_items: descriptor.menu_items.clone(),
            store,
            rating,
        }
    }

    /// Returns the settings key identifying this rating.
    pub fn settings_key(&self) -> &SettingsKey {
        &self.key
    }

    /// Returns the full type name of the rating.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the menu items declared by the rating type.
    pub fn menu_items(&self) -> &[MenuItem] {
        &self.menu_items
    }

    fn defaults(&self) -> Value {
        (self.default_settings)().unwrap_or_else(|| Value::Table(Table::new()))
    }

    /// Returns the rating's settings, storing the declared defaults on first access.
    pub fn settings(&self) -> Value {
        self.store.get_or_init(self.key.as_str(), || self.defaults())
    }

    /// Reads the `enabled` flag; absent means enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the flag is present but not a boolean.
    pub fn is_enabled(&self) -> Result<bool, ConfigError> {
        is_enabled(&self.key, &self.settings())
    }

    /// Switches the rating on or off.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        let key = self.key.as_str();
        self.store.update(
            key,
            || self.defaults(),
            |settings| match settings.as_table_mut() {
                Some(table) => {
                    table.insert(ENABLED_SETTING.to_string(), Value::Boolean(enabled));
                    Ok(())
                }
                None => Err(ConfigError::NotATable {
                    key: key.to_string(),
                }),
            },
        )
    }

    /// Returns the weight from the weight map, 1 if absent.
    pub fn weight(&self) -> Result<f64, ConfigError> {
        self.store.weight(self.key.as_str())
    }

    /// Stores a new weight in the weight map.
    pub fn set_weight(&self, weight: f64) -> Result<(), ConfigError> {
        self.store.set_weight(self.key.as_str(), weight)
    }

    /// Computes the raw, unweighted score of `schedule`.
    ///
    /// Returns 0 without calling into the rating while it is disabled.
    pub fn score(&mut self, schedule: &Schedule) -> Result<f64, RatingError> {
        let settings = self.settings();
        if !is_enabled(&self.key, &settings)? {
            return Ok(0.0);
        }

        let ctx = RatingContext {
            key: &self.key,
            schedule,
            settings: &settings,
        };
        self.rating.rate_schedule(&ctx)
    }

    /// Forwards a course list change to the rating.
    pub fn update_courses(&mut self, courses: &[Course]) {
        self.rating.on_course_list_updated(courses);
    }

    /// Runs a menu action against the rating's stored settings.
    ///
    /// Callers are expected to have checked the action against
    /// [`menu_items`](Self::menu_items).
    pub fn perform_action(&mut self, action: &str, event: Option<&Event>) -> Result<(), RatingError> {
        let defaults = self.defaults();
        let key = &self.key;
        let rating = &mut self.rating;
        self.store.update(
            key.as_str(),
            || defaults,
            |settings| {
                let mut ctx = ActionContext {
                    key,
                    settings,
                    event,
                };
                rating.perform_action(action, &mut ctx)
            },
        )
    }
}

fn is_enabled(key: &SettingsKey, settings: &Value) -> Result<bool, ConfigError> {
    match settings.get(ENABLED_SETTING) {
        None => Ok(true),
        Some(Value::Boolean(enabled)) => Ok(*enabled),
        Some(other) => Err(ConfigError::Invalid(format!(
            "`{}` of `{}` is not a boolean: {}",
            ENABLED_SETTING, key, other
        ))),
    }
}
