//! Weighted aggregation of rating scores.

use std::sync::Arc;

use tracing::{debug, warn};
use ttime_config::{SettingsKey, SettingsStore};
use ttime_core::{Course, Event, Schedule};

use crate::error::{ConstructionError, ScoringError};
use crate::instance::RatingInstance;
use crate::menu::MenuRegistry;
use crate::registry::RatingRegistry;

/// Contribution of one rating to an aggregate score.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingContribution {
    pub key: SettingsKey,
    pub enabled: bool,
    /// Unweighted score; 0 while disabled.
    pub raw: f64,
    /// Configured weight; `None` while disabled, since it is never applied.
    pub weight: Option<f64>,
    /// `raw * weight`, or exactly 0 while disabled.
    pub weighted: f64,
}

/// Per-rating explanation of an aggregate score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Contributions sorted by settings key.
    pub contributions: Vec<RatingContribution>,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Returns the contribution of the rating with settings key `key`.
    pub fn contribution(&self, key: &str) -> Option<&RatingContribution> {
        self.contributions.iter().find(|c| c.key.as_str() == key)
    }
}

/// Scores schedules with every enabled rating and sums the weighted results.
///
/// Rating instances are created on first use and reused afterwards. Scoring
/// takes `&mut self`, so callers sharing an aggregator across threads must
/// serialize access, e.g. with a `Mutex`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ttime_config::SettingsStore;
/// use ttime_core::Schedule;
/// use ttime_ratings::{builtin::FreeDays, RatingRegistry, WeightedAggregator};
///
/// let mut registry = RatingRegistry::new();
/// registry.register::<FreeDays>().unwrap();
///
/// let mut aggregator = WeightedAggregator::new(registry, Arc::new(SettingsStore::new()));
/// // an empty schedule leaves Sunday to Thursday free
/// assert_eq!(aggregator.aggregate_score(&Schedule::default()).unwrap(), 5.0);
/// ```
#[derive(Debug)]
pub struct WeightedAggregator {
    registry: RatingRegistry,
    store: Arc<SettingsStore>,
    menu: MenuRegistry,
    instances: Option<Vec<RatingInstance>>,
    failures: Vec<ConstructionError>,
}

impl WeightedAggregator {
    /// Creates an aggregator over every type in `registry`.
    pub fn new(registry: RatingRegistry, store: Arc<SettingsStore>) -> Self {
        let menu = registry.menu();
        Self {
            registry,
            store,
            menu,
            instances: None,
            failures: Vec::new(),
        }
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &RatingRegistry {
        &self.registry
    }

    /// Returns the settings store shared by all ratings.
    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    /// Returns the menu items declared by the registered ratings.
    pub fn menu(&self) -> &MenuRegistry {
        &self.menu
    }

    fn ensure_instances(&mut self) -> &mut Vec<RatingInstance> {
        let Self {
            registry,
            store,
            instances,
            failures,
            ..
        } = self;

        instances.get_or_insert_with(|| {
            let mut live = Vec::with_capacity(registry.len());
            for result in registry.instantiate_all(store) {
                match result {
                    Ok(instance) => live.push(instance),
                    Err(err) => {
                        warn!(
                            key = %err.key,
                            type_name = err.type_name,
                            error = %err.source,
                            "Rating construction failed"
                        );
                        failures.push(err);
                    }
                }
            }
            live
        })
    }

    /// Returns the live rating instances, constructing them if needed.
    pub fn instances(&mut self) -> &mut [RatingInstance] {
        self.ensure_instances()
    }

    /// Returns the live instance with settings key `key`.
    pub fn instance(&mut self, key: &str) -> Option<&mut RatingInstance> {
        self.ensure_instances()
            .iter_mut()
            .find(|i| i.settings_key().as_str() == key)
    }

    /// Returns the ratings that failed to construct; they never contribute.
    pub fn construction_failures(&mut self) -> &[ConstructionError] {
        self.ensure_instances();
        &self.failures
    }

    /// Computes the weighted sum of every rating's score for `schedule`.
    ///
    /// Disabled ratings contribute exactly 0. The sum is taken in settings key
    /// order, so the result does not depend on registration order.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of an enabled rating's computation.
    pub fn aggregate_score(&mut self, schedule: &Schedule) -> Result<f64, ScoringError> {
        self.explain(schedule).map(|breakdown| breakdown.total)
    }

    /// Computes the aggregate score together with every rating's contribution.
    pub fn explain(&mut self, schedule: &Schedule) -> Result<ScoreBreakdown, ScoringError> {
        let mut contributions = Vec::new();
        for instance in self.ensure_instances().iter_mut() {
            contributions.push(contribution(instance, schedule)?);
        }
        contributions.sort_by(|a, b| a.key.cmp(&b.key));

        let total: f64 = contributions.iter().map(|c| c.weighted).sum();
        debug!(ratings = contributions.len(), total, "Schedule scored");

        Ok(ScoreBreakdown {
            contributions,
            total,
        })
    }

    /// Notifies every live rating that the course list changed.
    pub fn update_courses(&mut self, courses: &[Course]) {
        for instance in self.ensure_instances().iter_mut() {
            instance.update_courses(courses);
        }
    }

    /// Runs a declared menu action of the rating with settings key `key`.
    ///
    /// # Errors
    ///
    /// Fails if the action is not declared, needs an event that was not
    /// given, the rating did not construct, or the action itself fails.
    pub fn invoke_menu_action(
        &mut self,
        key: &str,
        action: &str,
        event: Option<&Event>,
    ) -> Result<(), ScoringError> {
        let item = self
            .menu
            .find(key, action)
            .ok_or_else(|| ScoringError::UnknownAction {
                key: key.to_string(),
                action: action.to_string(),
            })?;
        if item.event_required && event.is_none() {
            return Err(ScoringError::EventRequired {
                key: key.to_string(),
                action: action.to_string(),
            });
        }

        let instance = self
            .instance(key)
            .ok_or_else(|| ScoringError::UnknownRating(key.to_string()))?;
        instance
            .perform_action(action, event)
            .map_err(|source| ScoringError::Rating {
                key: instance.settings_key().clone(),
                source,
            })
    }
}

fn contribution(
    instance: &mut RatingInstance,
    schedule: &Schedule,
) -> Result<RatingContribution, ScoringError> {
    let key = instance.settings_key().clone();
    let enabled = instance.is_enabled().map_err(|source| ScoringError::Settings {
        key: key.clone(),
        source,
    })?;
    if !enabled {
        return Ok(RatingContribution {
            key,
            enabled: false,
            raw: 0.0,
            weight: None,
            weighted: 0.0,
        });
    }

    let raw = instance
        .score(schedule)
        .map_err(|source| ScoringError::Rating {
            key: key.clone(),
            source,
        })?;
    let weight = instance.weight().map_err(|source| ScoringError::Settings {
        key: key.clone(),
        source,
    })?;

    Ok(RatingContribution {
        key,
        enabled: true,
        raw,
        weight: Some(weight),
        weighted: raw * weight,
    })
}
