//! TTime - schedule ratings for timetable planning
//!
//! Ratings are discovered from rating unit files, registered once and
//! combined into one weighted score per candidate schedule.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ttime::prelude::*;
//!
//! let store = Arc::new(SettingsStore::new());
//! let mut aggregator = ttime::builtin_ratings(store).unwrap();
//!
//! // no gaps, and Sunday to Thursday are all free
//! assert_eq!(aggregator.aggregate_score(&Schedule::default()).unwrap(), 5.0);
//! ```

// Timetable model
pub use ttime_core::{
    Course, Event, EventGroup, Result, Schedule, TtimeError, Weekday, MINUTES_PER_DAY,
};

// Settings and discovery configuration
pub use ttime_config::{ConfigError, RatingsConfig, SettingsKey, SettingsStore, Value};

// Rating contract and runtime
pub use ttime_ratings::{
    builtin, ActionContext, MenuItem, MenuRegistry, PluginLoader, Rating, RatingContext,
    RatingContribution, RatingError, RatingInstance, RatingModule, RatingRegistry, RatingType,
    ScoreBreakdown, ScoringError, WeightedAggregator,
};

mod session;
pub use session::{builtin_ratings, load_ratings, load_ratings_from};

pub mod prelude {
    pub use super::{Course, Event, EventGroup, Schedule, Weekday};
    pub use super::{RatingsConfig, SettingsStore};
    pub use super::{
        ActionContext, MenuItem, Rating, RatingContext, RatingError, RatingType, WeightedAggregator,
    };
}
