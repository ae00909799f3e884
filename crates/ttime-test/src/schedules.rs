//! Candidate schedule fixtures.

use ttime_core::{Event, EventGroup, Schedule, Weekday};

/// Two Monday events separated by `gap_minutes`: 08:30-10:30, then two hours.
pub fn monday_with_gap(gap_minutes: u16) -> Schedule {
    let first_end = 10 * 60 + 30;
    let second_start = first_end + gap_minutes;
    Schedule::new(vec![
        EventGroup::new("234111", 10).with_event(Event::new(Weekday::Monday, 8 * 60 + 30, first_end)),
        EventGroup::new("104166", 11).with_event(Event::new(
            Weekday::Monday,
            second_start,
            second_start + 120,
        )),
    ])
}

/// A week with events Sunday to Wednesday.
///
/// Gaps: one hour on Sunday, none on Monday, 30 minutes on Tuesday,
/// none on Wednesday. Thursday is free.
pub fn busy_week() -> Schedule {
    Schedule::new(vec![
        EventGroup::new("234111", 10)
            .with_event(Event::at(Weekday::Sunday, (8, 30), (10, 30)))
            .with_event(Event::at(Weekday::Tuesday, (12, 30), (14, 30))),
        EventGroup::new("104166", 11)
            .with_event(Event::at(Weekday::Sunday, (11, 30), (13, 30)))
            .with_event(Event::at(Weekday::Monday, (10, 30), (12, 30)).with_place("Ulman 101")),
        EventGroup::new("114071", 12)
            .with_event(Event::at(Weekday::Tuesday, (15, 0), (16, 30)))
            .with_event(Event::at(Weekday::Wednesday, (9, 30), (11, 30))),
    ])
}
