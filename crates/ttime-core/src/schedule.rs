//! Timetable data model.
//!
//! A [`Schedule`] is a candidate selection of [`EventGroup`]s, one or more per
//! course. Ratings only ever read it; flattening the groups with
//! [`Schedule::events`] yields the individual meetings to score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TtimeError};

/// Minutes in a day; event times are measured from midnight.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Day of the academic week.
///
/// The week starts on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays in calendar order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Returns the weekday for a 1-based day number (1 = Sunday).
    ///
    /// # Example
    ///
    /// ```
    /// use ttime_core::Weekday;
    ///
    /// assert_eq!(Weekday::from_number(1), Some(Weekday::Sunday));
    /// assert_eq!(Weekday::from_number(8), None);
    /// ```
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=7 => Some(Self::ALL[(number - 1) as usize]),
            _ => None,
        }
    }

    /// Returns the 1-based day number.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single weekly meeting of a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub weekday: Weekday,
    /// Start time in minutes from midnight.
    pub start: u16,
    /// End time in minutes from midnight.
    pub end: u16,
    #[serde(default)]
    pub place: Option<String>,
}

impl Event {
    /// Creates an event without a place.
    pub fn new(weekday: Weekday, start: u16, end: u16) -> Self {
        Self {
            weekday,
            start,
            end,
            place: None,
        }
    }

    /// Creates an event from hours and minutes, e.g. `at(Monday, (10, 30), (12, 30))`.
    ///
    /// Out-of-range times saturate instead of overflowing; [`validate`](Self::validate)
    /// rejects the resulting event.
    pub fn at(weekday: Weekday, start: (u16, u16), end: (u16, u16)) -> Self {
        Self::new(weekday, clock_minutes(start), clock_minutes(end))
    }

    /// Sets the place.
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    /// Duration in minutes.
    pub fn duration(&self) -> u16 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if both events meet on the same day at overlapping times.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.weekday == other.weekday && self.start < other.end && other.start < self.end
    }

    /// Checks that the event lies within one day and ends after it starts.
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(TtimeError::InvalidSchedule(format!(
                "event on {} ends ({}) before it starts ({})",
                self.weekday, self.end, self.start
            )));
        }
        if self.end > MINUTES_PER_DAY {
            return Err(TtimeError::InvalidSchedule(format!(
                "event on {} ends after midnight ({})",
                self.weekday, self.end
            )));
        }
        Ok(())
    }
}

fn clock_minutes((hours, minutes): (u16, u16)) -> u16 {
    hours.saturating_mul(60).saturating_add(minutes)
}

/// A lecture or tutorial group of a course together with its meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventGroup {
    /// Number of the owning course.
    pub course: String,
    /// Group number within the course.
    pub number: u32,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl EventGroup {
    /// Creates a group with no events.
    pub fn new(course: impl Into<String>, number: u32) -> Self {
        Self {
            course: course.into(),
            number,
            events: Vec::new(),
        }
    }

    /// Adds an event.
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }
}

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub groups: Vec<EventGroup>,
}

impl Course {
    /// Creates a course with no groups.
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// Adds a group.
    pub fn with_group(mut self, group: EventGroup) -> Self {
        self.groups.push(group);
        self
    }
}

/// A candidate schedule: the event groups selected for every course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub groups: Vec<EventGroup>,
}

impl Schedule {
    /// Creates a schedule from its selected groups.
    pub fn new(groups: Vec<EventGroup>) -> Self {
        Self { groups }
    }

    /// Returns the selected groups.
    pub fn groups(&self) -> &[EventGroup] {
        &self.groups
    }

    /// Iterates over every event of every selected group.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.groups.iter().flat_map(|g| g.events.iter())
    }

    /// Flattens the selected groups into a list of events.
    ///
    /// # Example
    ///
    /// ```
    /// use ttime_core::{Event, EventGroup, Schedule, Weekday};
    ///
    /// let schedule = Schedule::new(vec![
    ///     EventGroup::new("234111", 10).with_event(Event::at(Weekday::Sunday, (10, 30), (12, 30))),
    ///     EventGroup::new("104166", 11)
    ///         .with_event(Event::at(Weekday::Monday, (8, 30), (10, 30)))
    ///         .with_event(Event::at(Weekday::Tuesday, (14, 30), (16, 30))),
    /// ]);
    /// assert_eq!(schedule.event_list().len(), 3);
    /// ```
    pub fn event_list(&self) -> Vec<&Event> {
        self.events().collect()
    }

    /// Returns the events held on `weekday`, sorted by start time.
    pub fn events_on(&self, weekday: Weekday) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events().filter(|e| e.weekday == weekday).collect();
        events.sort_by_key(|e| (e.start, e.end));
        events
    }

    /// Returns true if no group is selected.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Validates every event of the schedule.
    pub fn validate(&self) -> Result<()> {
        self.events().try_for_each(Event::validate)
    }
}

impl FromIterator<EventGroup> for Schedule {
    fn from_iter<I: IntoIterator<Item = EventGroup>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
