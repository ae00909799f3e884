//! The rating contract.
//!
//! A rating is split in two halves:
//! - [`RatingType`] is the static, per-type descriptor: settings key, default
//!   settings, menu items and the zero-argument constructor.
//! - [`Rating`] is the object-safe behaviour of a constructed instance.
//!
//! The shared behaviour every rating gets for free (settings access, the
//! `enabled` flag, weights and the disabled short-circuit) lives in
//! [`RatingInstance`](crate::RatingInstance).

use serde::de::DeserializeOwned;
use serde::Serialize;
use ttime_config::{SettingsKey, Value};
use ttime_core::{Course, Event, Schedule};

use crate::error::RatingError;
use crate::menu::MenuItem;

/// Scoring behaviour of a rating instance.
///
/// Implementations return a raw, unweighted score on whatever scale they
/// choose; the aggregator applies the user's weight.
pub trait Rating: Send {
    /// Computes the raw score of `ctx.schedule`.
    ///
    /// Only called while the rating is enabled.
    fn rate_schedule(&mut self, ctx: &RatingContext<'_>) -> Result<f64, RatingError>;

    /// Called when the universe of available courses changes.
    fn on_course_list_updated(&mut self, _courses: &[Course]) {}

    /// Executes one of the menu actions declared by [`RatingType::menu_items`].
    fn perform_action(
        &mut self,
        action: &str,
        _ctx: &mut ActionContext<'_>,
    ) -> Result<(), RatingError> {
        Err(RatingError::UnknownAction(action.to_string()))
    }
}

/// Static descriptor of a rating type.
///
/// # Example
///
/// ```
/// use ttime_ratings::{Rating, RatingContext, RatingError, RatingType};
///
/// struct CountEvents;
///
/// impl RatingType for CountEvents {
///     fn create() -> Result<Self, RatingError> {
///         Ok(CountEvents)
///     }
/// }
///
/// impl Rating for CountEvents {
///     fn rate_schedule(&mut self, ctx: &RatingContext<'_>) -> Result<f64, RatingError> {
///         Ok(ctx.event_list().len() as f64)
///     }
/// }
/// ```
pub trait RatingType: Rating + Sized + 'static {
    /// Explicit settings key. `None` derives the key from the unqualified type name.
    fn settings_key() -> Option<&'static str> {
        None
    }

    /// Settings stored on first access. `None` means no configuration is needed.
    fn default_settings() -> Option<Value> {
        None
    }

    /// UI actions exposed by this rating type.
    fn menu_items() -> Vec<MenuItem> {
        Vec::new()
    }

    /// Zero-argument constructor.
    fn create() -> Result<Self, RatingError>;
}

/// Input of a single scoring call.
#[derive(Debug, Clone, Copy)]
pub struct RatingContext<'a> {
    pub key: &'a SettingsKey,
    pub schedule: &'a Schedule,
    pub settings: &'a Value,
}

impl<'a> RatingContext<'a> {
    /// Flattens the schedule's groups into its events.
    pub fn event_list(&self) -> Vec<&'a Event> {
        self.schedule.event_list()
    }

    /// Returns a single setting by name.
    pub fn setting(&self, name: &str) -> Option<&'a Value> {
        self.settings.get(name)
    }

    /// Deserializes the settings into a typed structure.
    pub fn settings_as<T: DeserializeOwned>(&self) -> Result<T, RatingError> {
        parse_settings(self.key, self.settings)
    }
}

/// Input of a menu action.
#[derive(Debug)]
pub struct ActionContext<'a> {
    pub key: &'a SettingsKey,
    pub settings: &'a mut Value,
    /// Event selected in the UI, if any.
    pub event: Option<&'a Event>,
}

impl ActionContext<'_> {
    /// Deserializes the settings into a typed structure.
    pub fn settings_as<T: DeserializeOwned>(&self) -> Result<T, RatingError> {
        parse_settings(self.key, self.settings)
    }

    /// Edits the settings through a typed structure.
    ///
    /// Fields of `T` are written back into the settings table; keys `T` does
    /// not know about are left untouched.
    pub fn update_settings<T, F>(&mut self, f: F) -> Result<(), RatingError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce(&mut T),
    {
        let mut typed: T = self.settings_as()?;
        f(&mut typed);
        let updated = Value::try_from(typed).map_err(|e| RatingError::InvalidSettings {
            key: self.key.to_string(),
            reason: e.to_string(),
        })?;

        match (self.settings.as_table_mut(), updated) {
            (Some(table), Value::Table(fields)) => {
                for (name, value) in fields {
                    table.insert(name, value);
                }
            }
            (_, updated) => *self.settings = updated,
        }
        Ok(())
    }
}

fn parse_settings<T: DeserializeOwned>(key: &SettingsKey, settings: &Value) -> Result<T, RatingError> {
    settings
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| RatingError::InvalidSettings {
            key: key.to_string(),
            reason: e.to_string(),
        })
}
