//! Ratings shipped with TTime.
//!
//! Each rating is exposed as a [`RatingModule`] so rating units can activate
//! it by name.

mod free_days;
mod gaps;

pub use free_days::{FreeDays, FreeDaysSettings};
pub use gaps::{Gaps, GapsSettings};

use ttime_config::ConfigError;

use crate::loader::RatingModule;
use crate::registry::RatingRegistry;

/// Every built-in rating module.
pub const MODULES: &[RatingModule] = &[
    RatingModule {
        name: "gaps",
        register: register_gaps,
    },
    RatingModule {
        name: "free_days",
        register: register_free_days,
    },
];

fn register_gaps(registry: &mut RatingRegistry) -> Result<usize, ConfigError> {
    registry.register::<Gaps>().map(usize::from)
}

fn register_free_days(registry: &mut RatingRegistry) -> Result<usize, ConfigError> {
    registry.register::<FreeDays>().map(usize::from)
}
