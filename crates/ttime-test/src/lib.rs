//! Shared test fixtures for TTime crates.
//!
//! This crate provides timetable data for testing. It depends only on
//! `ttime-core`, so every other crate can use it as a dev-dependency.
//!
//! - [`schedules`] - candidate schedules with known gaps and free days
//! - [`courses`] - a small course catalog
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! ttime-test = { workspace = true }
//! ```
//!
//! ```
//! use ttime_test::schedules::monday_with_gap;
//!
//! let schedule = monday_with_gap(90);
//! assert_eq!(schedule.event_list().len(), 2);
//! ```

pub mod courses;
pub mod schedules;

pub use courses::catalog;
pub use schedules::{busy_week, monday_with_gap};
