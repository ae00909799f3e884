// Rewards days left without any event.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ttime_config::Value;
use ttime_core::{Course, Weekday};

use crate::error::RatingError;
use crate::menu::MenuItem;
use crate::rating::{ActionContext, Rating, RatingContext, RatingType};

const DEFAULT_DAYS: [Weekday; 5] = [
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
];

/// Typed view of the `FreeDays` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeDaysSettings {
    /// Days that count when left free.
    pub days: Vec<Weekday>,
}

impl Default for FreeDaysSettings {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS.to_vec(),
        }
    }
}

/// Scores a schedule by the number of watched days it leaves free.
///
/// Once a course list is known, days on which no course meets at all are not
/// counted: every schedule leaves them free.
#[derive(Debug, Default)]
pub struct FreeDays {
    offered_days: Option<BTreeSet<Weekday>>,
}

impl RatingType for FreeDays {
    fn default_settings() -> Option<Value> {
        let days = DEFAULT_DAYS
            .iter()
            .map(|d| Value::String(d.to_string().to_lowercase()))
            .collect();

        let mut settings = toml::Table::new();
        settings.insert("enabled".into(), Value::Boolean(true));
        settings.insert("days".into(), Value::Array(days));
        Some(Value::Table(settings))
    }

    fn menu_items() -> Vec<MenuItem> {
        vec![MenuItem::new("Restore default free days", "reset_days")]
    }

    fn create() -> Result<Self, RatingError> {
        Ok(Self::default())
    }
}

impl Rating for FreeDays {
    fn rate_schedule(&mut self, ctx: &RatingContext<'_>) -> Result<f64, RatingError> {
        let settings: FreeDaysSettings = ctx.settings_as()?;
        let busy: BTreeSet<Weekday> = ctx.schedule.events().map(|e| e.weekday).collect();

        let watched: BTreeSet<Weekday> = settings.days.into_iter().collect();
        let free = watched
            .iter()
            .filter(|day| !busy.contains(*day))
            .filter(|day| self.offered_days.as_ref().map_or(true, |o| o.contains(*day)))
            .count();

        Ok(free as f64)
    }

    fn on_course_list_updated(&mut self, courses: &[Course]) {
        let offered = courses
            .iter()
            .flat_map(|c| c.groups.iter())
            .flat_map(|g| g.events.iter())
            .map(|e| e.weekday)
            .collect();
        self.offered_days = Some(offered);
    }

    fn perform_action(&mut self, action: &str, ctx: &mut ActionContext<'_>) -> Result<(), RatingError> {
        match action {
            "reset_days" => ctx.update_settings(|s: &mut FreeDaysSettings| {
                *s = FreeDaysSettings::default();
            }),
            _ => Err(RatingError::UnknownAction(action.to_string())),
        }
    }
}
