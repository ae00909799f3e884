//! Tests for the built-in Gaps and FreeDays ratings.

use ttime_config::Value;
use ttime_core::{Event, Schedule, Weekday};
use ttime_test::{busy_week, catalog, monday_with_gap};

use crate::aggregator::WeightedAggregator;
use crate::builtin::{FreeDays, FreeDaysSettings, Gaps, GapsSettings, MODULES};
use crate::registry::RatingRegistry;
use crate::test_utils::store;
use crate::RatingType;

fn aggregator_with<R: RatingType>() -> WeightedAggregator {
    let mut registry = RatingRegistry::new();
    registry.register::<R>().unwrap();
    WeightedAggregator::new(registry, store())
}

fn gaps_settings(aggregator: &mut WeightedAggregator) -> GapsSettings {
    let settings = aggregator.instance("Gaps").unwrap().settings();
    settings.try_into().unwrap()
}

#[test]
fn test_builtin_modules_are_named() {
    let names: Vec<&str> = MODULES.iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["gaps", "free_days"]);
}

// ============================================================================
// Gaps
// ============================================================================

#[test]
fn test_gaps_default_settings_parse() {
    let settings: GapsSettings = Gaps::default_settings().unwrap().try_into().unwrap();
    assert_eq!(settings, GapsSettings::default());
}

#[test]
fn test_gaps_empty_schedule_scores_zero() {
    let mut aggregator = aggregator_with::<Gaps>();
    assert_eq!(aggregator.aggregate_score(&Schedule::default()).unwrap(), 0.0);
}

#[test]
fn test_gaps_counts_hours_between_events() {
    let mut aggregator = aggregator_with::<Gaps>();
    assert_eq!(aggregator.aggregate_score(&monday_with_gap(90)).unwrap(), -1.5);
    assert_eq!(aggregator.aggregate_score(&monday_with_gap(0)).unwrap(), 0.0);
}

#[test]
fn test_gaps_over_a_week() {
    let mut aggregator = aggregator_with::<Gaps>();
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), -1.5);
}

#[test]
fn test_gaps_ignores_time_covered_by_overlapping_events() {
    let schedule: Schedule = vec![ttime_core::EventGroup::new("1", 1)
        .with_event(Event::at(Weekday::Monday, (8, 0), (12, 0)))
        .with_event(Event::at(Weekday::Monday, (9, 0), (10, 0)))
        .with_event(Event::at(Weekday::Monday, (13, 0), (14, 0)))]
    .into_iter()
    .collect();

    let mut aggregator = aggregator_with::<Gaps>();
    assert_eq!(aggregator.aggregate_score(&schedule).unwrap(), -1.0);
}

#[test]
fn test_gaps_tolerates_short_breaks() {
    let mut aggregator = aggregator_with::<Gaps>();
    let mut settings = toml::Table::new();
    settings.insert("max_gap_minutes".into(), Value::Integer(30));
    aggregator.store().set("Gaps", Value::Table(settings));

    // Tuesday's 30 minute break is tolerated, Sunday's hour is not
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), -1.0);
}

#[test]
fn test_gaps_ignore_day_action() {
    let mut aggregator = aggregator_with::<Gaps>();
    let sunday = Event::at(Weekday::Sunday, (8, 30), (10, 30));

    aggregator
        .invoke_menu_action("Gaps", "ignore_day", Some(&sunday))
        .unwrap();
    aggregator
        .invoke_menu_action("Gaps", "ignore_day", Some(&sunday))
        .unwrap();

    assert_eq!(gaps_settings(&mut aggregator).ignored_days, vec![Weekday::Sunday]);
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), -0.5);
}

#[test]
fn test_gaps_clear_ignored_days_action() {
    let mut aggregator = aggregator_with::<Gaps>();
    let tuesday = Event::at(Weekday::Tuesday, (12, 30), (14, 30));
    aggregator
        .invoke_menu_action("Gaps", "ignore_day", Some(&tuesday))
        .unwrap();
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), -1.0);

    aggregator
        .invoke_menu_action("Gaps", "clear_ignored_days", None)
        .unwrap();
    assert!(gaps_settings(&mut aggregator).ignored_days.is_empty());
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), -1.5);
}

#[test]
fn test_gaps_actions_keep_enabled_flag() {
    let mut aggregator = aggregator_with::<Gaps>();
    aggregator.instance("Gaps").unwrap().set_enabled(false).unwrap();

    aggregator
        .invoke_menu_action("Gaps", "clear_ignored_days", None)
        .unwrap();
    assert!(!aggregator.instance("Gaps").unwrap().is_enabled().unwrap());
}

#[test]
fn test_gaps_rejects_malformed_settings() {
    let mut aggregator = aggregator_with::<Gaps>();
    let mut settings = toml::Table::new();
    settings.insert("max_gap_minutes".into(), Value::String("long".into()));
    aggregator.store().set("Gaps", Value::Table(settings));

    assert!(aggregator.aggregate_score(&busy_week()).is_err());
}

// ============================================================================
// FreeDays
// ============================================================================

#[test]
fn test_free_days_default_settings_parse() {
    let settings: FreeDaysSettings = FreeDays::default_settings().unwrap().try_into().unwrap();
    assert_eq!(settings, FreeDaysSettings::default());
    assert_eq!(settings.days.len(), 5);
}

#[test]
fn test_free_days_counts_watched_days_without_events() {
    let mut aggregator = aggregator_with::<FreeDays>();
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), 1.0);
    assert_eq!(aggregator.aggregate_score(&monday_with_gap(30)).unwrap(), 4.0);
}

#[test]
fn test_free_days_skips_days_no_course_meets() {
    let mut aggregator = aggregator_with::<FreeDays>();
    aggregator.update_courses(&catalog());

    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), 0.0);
    // Sunday, Tuesday and Wednesday are offered and free
    assert_eq!(aggregator.aggregate_score(&monday_with_gap(30)).unwrap(), 3.0);
}

#[test]
fn test_free_days_custom_days() {
    let mut aggregator = aggregator_with::<FreeDays>();
    let mut settings = toml::Table::new();
    settings.insert(
        "days".into(),
        Value::Array(vec![Value::String("thursday".into()), Value::String("friday".into())]),
    );
    aggregator.store().set("FreeDays", Value::Table(settings));

    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), 2.0);
}

#[test]
fn test_free_days_reset_action() {
    let mut aggregator = aggregator_with::<FreeDays>();
    let mut settings = toml::Table::new();
    settings.insert("enabled".into(), Value::Boolean(true));
    settings.insert("days".into(), Value::Array(Vec::new()));
    aggregator.store().set("FreeDays", Value::Table(settings));
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), 0.0);

    aggregator
        .invoke_menu_action("FreeDays", "reset_days", None)
        .unwrap();
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), 1.0);
}

// ============================================================================
// Both
// ============================================================================

#[test]
fn test_builtins_weighted_together() {
    let mut registry = RatingRegistry::new();
    registry.register::<Gaps>().unwrap();
    registry.register::<FreeDays>().unwrap();
    let mut aggregator = WeightedAggregator::new(registry, store());
    aggregator.instance("FreeDays").unwrap().set_weight(2.0).unwrap();

    // -1.5 for gaps, 2 * 1 for Thursday
    assert_eq!(aggregator.aggregate_score(&busy_week()).unwrap(), 0.5);

    let menu = aggregator.menu();
    assert_eq!(menu.items_for("Gaps").len(), 2);
    assert_eq!(menu.items_for("FreeDays").len(), 1);
}
