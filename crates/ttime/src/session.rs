//! Entry points wiring discovery, registration and aggregation together.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use ttime_config::{RatingsConfig, SettingsStore};
use ttime_core::Result;
use ttime_ratings::{PluginLoader, RatingRegistry, WeightedAggregator};

/// Discovers rating units on the search path described by `config` and
/// builds an aggregator over the ratings they activate.
///
/// Ratings read and write their settings through `store`.
///
/// # Errors
///
/// Fails on unreadable directories, malformed units, units naming an
/// unknown module, and settings key conflicts between ratings.
pub fn load_ratings(config: RatingsConfig, store: Arc<SettingsStore>) -> Result<WeightedAggregator> {
    init_console();

    let mut loader = PluginLoader::new(config);
    let mut registry = RatingRegistry::new();
    let units = loader.discover(&mut registry)?;
    Ok(finish(units, registry, store))
}

/// Like [`load_ratings`], but searches only `dirs`, in order.
pub fn load_ratings_from(dirs: &[PathBuf], store: Arc<SettingsStore>) -> Result<WeightedAggregator> {
    init_console();

    let mut loader = PluginLoader::new(RatingsConfig::with_dirs(dirs.iter().cloned()));
    let mut registry = RatingRegistry::new();
    let units = loader.discover_in(dirs, &mut registry)?;
    Ok(finish(units, registry, store))
}

/// Builds an aggregator over every built-in rating without reading any unit.
pub fn builtin_ratings(store: Arc<SettingsStore>) -> Result<WeightedAggregator> {
    init_console();

    let mut loader = PluginLoader::default();
    let mut registry = RatingRegistry::new();
    let modules = loader.load_all_modules(&mut registry)?;
    Ok(finish(modules, registry, store))
}

fn finish(units: usize, registry: RatingRegistry, store: Arc<SettingsStore>) -> WeightedAggregator {
    info!(units, ratings = registry.len(), "Ratings ready");
    WeightedAggregator::new(registry, store)
}

fn init_console() {
    #[cfg(feature = "console")]
    ttime_console::init();
}
