// Penalizes idle time between events held on the same day.

use serde::{Deserialize, Serialize};
use ttime_config::Value;
use ttime_core::{Event, Weekday};

use crate::error::RatingError;
use crate::menu::MenuItem;
use crate::rating::{ActionContext, Rating, RatingContext, RatingType};

/// Typed view of the `Gaps` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapsSettings {
    /// Gaps up to this many minutes are not penalized.
    pub max_gap_minutes: u16,
    /// Days whose gaps are never penalized.
    pub ignored_days: Vec<Weekday>,
}

/// Scores a schedule by minus the hours spent waiting between events.
#[derive(Debug, Default)]
pub struct Gaps;

impl Gaps {
    // Total gap minutes of one day's events, sorted by start time.
    fn day_gaps(events: &[&Event], max_gap: u16) -> u32 {
        let Some((first, rest)) = events.split_first() else {
            return 0;
        };

        let mut busy_until = first.end;
        let mut total = 0u32;
        for event in rest {
            if event.start > busy_until {
                let gap = event.start - busy_until;
                if gap > max_gap {
                    total += u32::from(gap);
                }
            }
            busy_until = busy_until.max(event.end);
        }
        total
    }
}

impl RatingType for Gaps {
    fn default_settings() -> Option<Value> {
        let mut settings = toml::Table::new();
        settings.insert("enabled".into(), Value::Boolean(true));
        settings.insert("max_gap_minutes".into(), Value::Integer(0));
        settings.insert("ignored_days".into(), Value::Array(Vec::new()));
        Some(Value::Table(settings))
    }

    fn menu_items() -> Vec<MenuItem> {
        vec![
            MenuItem::with_event("Ignore gaps on this day", "ignore_day"),
            MenuItem::new("Penalize gaps on every day", "clear_ignored_days"),
        ]
    }

    fn create() -> Result<Self, RatingError> {
        Ok(Gaps)
    }
}

impl Rating for Gaps {
    fn rate_schedule(&mut self, ctx: &RatingContext<'_>) -> Result<f64, RatingError> {
        let settings: GapsSettings = ctx.settings_as()?;

        let minutes: u32 = Weekday::ALL
            .iter()
            .filter(|day| !settings.ignored_days.contains(*day))
            .map(|&day| Self::day_gaps(&ctx.schedule.events_on(day), settings.max_gap_minutes))
            .sum();

        Ok(-f64::from(minutes) / 60.0)
    }

    fn perform_action(&mut self, action: &str, ctx: &mut ActionContext<'_>) -> Result<(), RatingError> {
        match action {
            "ignore_day" => {
                let Some(day) = ctx.event.map(|e| e.weekday) else {
                    return Err(RatingError::Computation(
                        "ignore_day needs a selected event".to_string(),
                    ));
                };
                ctx.update_settings(|s: &mut GapsSettings| {
                    if !s.ignored_days.contains(&day) {
                        s.ignored_days.push(day);
                        s.ignored_days.sort();
                    }
                })
            }
            "clear_ignored_days" => {
                ctx.update_settings(|s: &mut GapsSettings| s.ignored_days.clear())
            }
            _ => Err(RatingError::UnknownAction(action.to_string())),
        }
    }
}
