//! Course catalog fixtures.

use ttime_core::{Course, Event, EventGroup, Weekday};

/// Three courses meeting only Sunday to Wednesday.
pub fn catalog() -> Vec<Course> {
    vec![
        Course::new("234111", "Introduction to Computer Science").with_group(
            EventGroup::new("234111", 10)
                .with_event(Event::at(Weekday::Sunday, (8, 30), (10, 30)))
                .with_event(Event::at(Weekday::Tuesday, (12, 30), (14, 30))),
        ),
        Course::new("104166", "Linear Algebra").with_group(
            EventGroup::new("104166", 11)
                .with_event(Event::at(Weekday::Sunday, (11, 30), (13, 30)))
                .with_event(Event::at(Weekday::Monday, (10, 30), (12, 30))),
        ),
        Course::new("114071", "Physics 1").with_group(
            EventGroup::new("114071", 12)
                .with_event(Event::at(Weekday::Tuesday, (15, 0), (16, 30)))
                .with_event(Event::at(Weekday::Wednesday, (9, 30), (11, 30))),
        ),
    ]
}
