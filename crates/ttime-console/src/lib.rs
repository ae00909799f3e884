//! Colorful console output for rating events.
//!
//! Provides a custom `tracing` layer that formats rating discovery and
//! scoring events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Rating units being loaded, ratings ready for scoring
//! - **WARN**: Ratings that failed to construct
//! - **DEBUG**: Skipped directories and units, schedule totals

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "ttime_ratings=info,ttime=info";

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect. An already
/// installed global subscriber is left in place.
pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(RatingsConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats rating events with colors.
pub struct RatingsConsoleLayer;

impl<S: Subscriber> Layer<S> for RatingsConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("ttime") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    message: Option<String>,
    unit: Option<String>,
    path: Option<String>,
    module: Option<String>,
    dir: Option<String>,
    key: Option<String>,
    type_name: Option<String>,
    error: Option<String>,
    units: Option<u64>,
    ratings: Option<u64>,
    total: Option<f64>,
}

impl EventVisitor {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "message" => self.message = Some(value),
            "unit" => self.unit = Some(value),
            "path" => self.path = Some(value),
            "module" => self.module = Some(value),
            "dir" => self.dir = Some(value),
            "key" => self.key = Some(value),
            "type_name" => self.type_name = Some(value),
            "error" => self.error = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "units" => self.units = Some(value),
            "ratings" => self.ratings = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "total" {
            self.total = Some(value);
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.message.as_deref().unwrap_or("") {
        "Loading rating" => format_loading(v),
        "Ratings ready" => format_ready(v),
        "Rating construction failed" => format_construction_failed(v),
        "Schedule scored" => format_scored(v),
        "Skipping missing rating directory" => format_skipped_dir(v),
        "Rating unit already loaded" => format_skipped_unit(v),
        other if level <= Level::WARN => {
            format!("{} {}", "!".bright_red().bold(), other.bright_white())
        }
        _ => String::new(),
    }
}

fn format_loading(v: &EventVisitor) -> String {
    let unit = v.unit.as_deref().unwrap_or("?");
    let module = v.module.as_deref().unwrap_or(unit);

    let mut output = format!(
        "{} Loading rating {} │ module {}",
        "●".bright_green().bold(),
        unit.bright_white().bold(),
        module.bright_cyan()
    );
    if let Some(path) = &v.path {
        output.push_str(&format!(" │ {}", path.bright_black()));
    }
    output
}

fn format_ready(v: &EventVisitor) -> String {
    format!(
        "{} Ratings ready │ {} ratings │ {} units",
        "▶".bright_green().bold(),
        v.ratings.unwrap_or(0).bright_yellow(),
        v.units.unwrap_or(0).bright_yellow()
    )
}

fn format_construction_failed(v: &EventVisitor) -> String {
    format!(
        "{} Rating {} failed to construct │ {} │ {}",
        "✗".bright_red().bold(),
        v.key.as_deref().unwrap_or("?").bright_white().bold(),
        v.type_name.as_deref().unwrap_or("?").bright_black(),
        v.error.as_deref().unwrap_or("unknown error").red()
    )
}

fn format_scored(v: &EventVisitor) -> String {
    let total = v.total.unwrap_or(0.0);
    let total = if total < 0.0 {
        format!("{:.3}", total).bright_red().to_string()
    } else {
        format!("{:.3}", total).bright_green().to_string()
    };

    format!(
        "{} Scored │ {} ratings │ total {}",
        "◆".bright_blue(),
        v.ratings.unwrap_or(0).bright_yellow(),
        total
    )
}

fn format_skipped_dir(v: &EventVisitor) -> String {
    format!(
        "{} {}",
        "·".bright_black(),
        format!("no rating directory at {}", v.dir.as_deref().unwrap_or("?")).bright_black()
    )
}

fn format_skipped_unit(v: &EventVisitor) -> String {
    format!(
        "{} {}",
        "·".bright_black(),
        format!("{} already loaded", v.unit.as_deref().unwrap_or("?")).bright_black()
    )
}
