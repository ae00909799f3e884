//! Test utilities for ttime-ratings
//!
//! Ratings with fixed scores and failure modes, used across the crate's
//! test modules.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use ttime_config::{SettingsStore, Value};

use crate::error::RatingError;
use crate::menu::MenuItem;
use crate::rating::{ActionContext, Rating, RatingContext, RatingType};
use crate::registry::RatingRegistry;
use crate::WeightedAggregator;

/// Declares a rating type returning a constant raw score.
macro_rules! fixed_rating {
    ($name:ident, $score:expr) => {
        fixed_rating!($name, $score, None);
    };
    ($name:ident, $score:expr, $key:expr) => {
        #[derive(Debug)]
        pub struct $name;

        impl RatingType for $name {
            fn settings_key() -> Option<&'static str> {
                $key
            }

            fn create() -> Result<Self, RatingError> {
                Ok($name)
            }
        }

        impl Rating for $name {
            fn rate_schedule(&mut self, _ctx: &RatingContext<'_>) -> Result<f64, RatingError> {
                Ok($score)
            }
        }
    };
}

// "Gaps" is also the key of the built-in rating; the two are never registered together.
fixed_rating!(FixedGaps, 10.0, Some("Gaps"));
fixed_rating!(Overlaps, -5.0);
fixed_rating!(Huge, 1e16);
fixed_rating!(NegHuge, -1e16);
fixed_rating!(Unit, 1.0);
fixed_rating!(Impostor, 3.0, Some("Overlaps"));
fixed_rating!(Nameless, 0.0, Some(""));

/// Fails its zero-argument construction.
#[derive(Debug)]
pub struct Broken;

impl RatingType for Broken {
    fn create() -> Result<Self, RatingError> {
        Err(RatingError::Construction("missing data file".to_string()))
    }
}

impl Rating for Broken {
    fn rate_schedule(&mut self, _ctx: &RatingContext<'_>) -> Result<f64, RatingError> {
        Ok(0.0)
    }
}

/// Fails every score computation.
#[derive(Debug)]
pub struct Failing;

impl RatingType for Failing {
    fn create() -> Result<Self, RatingError> {
        Ok(Failing)
    }
}

impl Rating for Failing {
    fn rate_schedule(&mut self, _ctx: &RatingContext<'_>) -> Result<f64, RatingError> {
        Err(RatingError::Computation("division by zero".to_string()))
    }
}

/// Number of times [`Counted`] has been asked for a score.
pub static COUNTED_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Counts its score computations in [`COUNTED_CALLS`].
#[derive(Debug)]
pub struct Counted;

impl RatingType for Counted {
    fn create() -> Result<Self, RatingError> {
        Ok(Counted)
    }
}

impl Rating for Counted {
    fn rate_schedule(&mut self, _ctx: &RatingContext<'_>) -> Result<f64, RatingError> {
        COUNTED_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(7.0)
    }
}

/// Declares defaults and menu items, and scores by its `threshold` setting.
#[derive(Debug)]
pub struct Threshold;

impl RatingType for Threshold {
    fn settings_key() -> Option<&'static str> {
        Some("threshold_rating")
    }

    fn default_settings() -> Option<Value> {
        let mut settings = toml::Table::new();
        settings.insert("enabled".into(), Value::Boolean(true));
        settings.insert("threshold".into(), Value::Integer(3));
        Some(Value::Table(settings))
    }

    fn menu_items() -> Vec<MenuItem> {
        vec![
            MenuItem::new("Raise threshold", "raise"),
            MenuItem::with_event("Explode", "explode"),
        ]
    }

    fn create() -> Result<Self, RatingError> {
        Ok(Threshold)
    }
}

impl Rating for Threshold {
    fn rate_schedule(&mut self, ctx: &RatingContext<'_>) -> Result<f64, RatingError> {
        let threshold = ctx
            .setting("threshold")
            .and_then(Value::as_integer)
            .unwrap_or(0);
        Ok(threshold as f64)
    }

    fn perform_action(&mut self, action: &str, ctx: &mut ActionContext<'_>) -> Result<(), RatingError> {
        match action {
            "raise" => {
                let table = ctx.settings.as_table_mut().expect("settings table");
                let current = table.get("threshold").and_then(Value::as_integer).unwrap_or(0);
                table.insert("threshold".into(), Value::Integer(current + 1));
                Ok(())
            }
            "explode" => Err(RatingError::Computation("boom".to_string())),
            _ => Err(RatingError::UnknownAction(action.to_string())),
        }
    }
}

/// Creates an empty shared settings store.
pub fn store() -> Arc<SettingsStore> {
    Arc::new(SettingsStore::new())
}

/// Builds an aggregator over the scenario ratings `Gaps` (10) and `Overlaps` (-5).
pub fn scenario_aggregator() -> WeightedAggregator {
    let mut registry = RatingRegistry::new();
    registry.register::<FixedGaps>().unwrap();
    registry.register::<Overlaps>().unwrap();
    WeightedAggregator::new(registry, store())
}

/// Collects the message of every tracing event.
#[derive(Clone, Default)]
struct MessageLayer(Arc<Mutex<Vec<String>>>);

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{:?}", value));
        }
    }
}

impl<S: Subscriber> Layer<S> for MessageLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.0.lock().unwrap().push(message);
        }
    }
}

/// Runs `f` and returns its result with the messages it logged on this thread.
pub fn capture_messages<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let layer = MessageLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let messages = layer.0.lock().unwrap().clone();
    (result, messages)
}
