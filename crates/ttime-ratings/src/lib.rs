//! Pluggable schedule ratings for TTime.
//!
//! This crate turns independently written ratings into one score per
//! candidate schedule:
//! - [`Rating`] / [`RatingType`], the contract every rating implements
//! - [`PluginLoader`], which activates compiled-in rating modules from
//!   rating unit files found on the search path
//! - [`RatingRegistry`], holding one typed descriptor per rating type
//! - [`WeightedAggregator`], which sums `raw score * weight` over every
//!   enabled rating
//! - [`MenuRegistry`], the UI actions declared by ratings
//!
//! # Architecture
//!
//! Ratings never touch a global: the [`SettingsStore`](ttime_config::SettingsStore)
//! is created by the application and injected into every [`RatingInstance`].

pub mod aggregator;
pub mod builtin;
pub mod error;
pub mod instance;
pub mod loader;
pub mod menu;
pub mod rating;
pub mod registry;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod tests;

pub use aggregator::{RatingContribution, ScoreBreakdown, WeightedAggregator};
pub use error::{ConstructionError, LoadError, RatingError, ScoringError};
pub use instance::{RatingInstance, ENABLED_SETTING};
pub use loader::{PluginLoader, RatingModule, UnitManifest};
pub use menu::{MenuItem, MenuRegistry};
pub use rating::{ActionContext, Rating, RatingContext, RatingType};
pub use registry::{RatingDescriptor, RatingRegistry};
