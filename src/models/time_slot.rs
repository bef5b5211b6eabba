//! Weekdays and time slot definitions.
//!
//! A time slot is one cell of the weekly grid: a day plus a half-open
//! clock interval [start, end). Slots on the same day are expected not to
//! overlap; consecutive slots are *contiguous* when one ends exactly where
//! the next begins, which is what multi-hour sessions require.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the teaching week.
///
/// Ordered Monday first so grids and outputs sort naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Monday through Friday.
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A placeable cell of the weekly grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: String,
    /// Day of the week.
    pub day: Day,
    /// Start time (inclusive).
    pub start: NaiveTime,
    /// End time (exclusive).
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Creates a new time slot.
    pub fn new(id: impl Into<String>, day: Day, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: id.into(),
            day,
            start,
            end,
        }
    }

    /// Creates an hourly slot `[hour:00, hour+1:00)`.
    ///
    /// Returns `None` for hours outside 0..23.
    pub fn hourly(id: impl Into<String>, day: Day, hour: u32) -> Option<Self> {
        let start = NaiveTime::from_hms_opt(hour, 0, 0)?;
        let end = NaiveTime::from_hms_opt(hour + 1, 0, 0)?;
        Some(Self::new(id, day, start, end))
    }

    /// Slot length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether two slots on the same day overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

/// Builds a Monday-Friday grid of hourly slots `[first_hour, last_hour)`.
///
/// Slot ids have the form `Mon-09`.
pub fn weekday_hourly_grid(first_hour: u32, last_hour: u32) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    for day in Day::WEEKDAYS {
        let prefix: String = day.to_string().chars().take(3).collect();
        for hour in first_hour..last_hour {
            if let Some(slot) = TimeSlot::hourly(format!("{prefix}-{hour:02}"), day, hour) {
                slots.push(slot);
            }
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_slot_duration() {
        let s = TimeSlot::new("S1", Day::Monday, t(9, 0), t(10, 30));
        assert_eq!(s.duration_minutes(), 90);
    }

    #[test]
    fn test_slot_overlap() {
        let a = TimeSlot::new("A", Day::Monday, t(9, 0), t(10, 0));
        let b = TimeSlot::new("B", Day::Monday, t(9, 30), t(10, 30));
        let c = TimeSlot::new("C", Day::Monday, t(10, 0), t(11, 0));
        let d = TimeSlot::new("D", Day::Tuesday, t(9, 0), t(10, 0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // half-open
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_day_ordering() {
        assert!(Day::Monday < Day::Friday);
        let mut days = vec![Day::Friday, Day::Monday, Day::Wednesday];
        days.sort();
        assert_eq!(days, vec![Day::Monday, Day::Wednesday, Day::Friday]);
    }

    #[test]
    fn test_weekday_grid() {
        let grid = weekday_hourly_grid(9, 17);
        assert_eq!(grid.len(), 40);
        assert_eq!(grid[0].id, "Mon-09");
        assert_eq!(grid[39].id, "Fri-16");
        assert_eq!(grid[39].end, t(17, 0));
    }

    #[test]
    fn test_hourly_out_of_range() {
        assert!(TimeSlot::hourly("x", Day::Monday, 23).is_none());
        assert!(TimeSlot::hourly("x", Day::Monday, 22).is_some());
    }
}
