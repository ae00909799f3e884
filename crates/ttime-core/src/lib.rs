//! TTime Core - Timetable types shared by the TTime crates
//!
//! This crate provides the read-only view of a timetable that ratings consume:
//! - `Schedule`, the candidate schedule being scored
//! - `EventGroup` and `Event`, the selected lecture/tutorial groups
//! - `Course`, the universe of available courses
//! - `TtimeError`, the umbrella error type

pub mod error;
pub mod schedule;


pub use error::{Result, TtimeError};
pub use schedule::{Course, Event, EventGroup, Schedule, Weekday, MINUTES_PER_DAY};
