//! Constraint model.
//!
//! Hard rules every placement must satisfy, and the soft imbalance measures
//! that fitness and KPI reporting share.
//!
//! # Hard rules
//!
//! | Rule | Check |
//! |------|-------|
//! | No faculty / room / division double booking | [`ResourceTracker`] |
//! | Faculty qualified for subject and division | [`faculty_qualified`] |
//! | Faculty free in every covered slot | `TimetableProblem::faculty_available` |
//! | Room capacity and type | [`room_suitable`] |
//! | Faculty weekly budget | [`within_budget`] |
//!
//! # Soft measures
//!
//! - [`idle_gaps`]: empty slots between a division's first and last session
//!   of a day.
//! - [`load_variance`]: population variance of a faculty member's hours
//!   across the teaching days.

mod grid;
mod tracker;

pub use grid::{Cell, Grid, GridDay, GridSlot};
pub use tracker::{ResourceKind, ResourceTracker};

use crate::models::{Division, Faculty, Room, Subject};

/// Whether a faculty member may teach `subject` to `division`.
pub fn faculty_qualified(faculty: &Faculty, subject: &Subject, division: &Division) -> bool {
    faculty.teaches(&subject.id) && faculty.serves_division(&division.id)
}

/// Whether a room can host a session of `subject` for `division`.
pub fn room_suitable(room: &Room, subject: &Subject, division: &Division) -> bool {
    room.suits(subject.session_type, division.student_count)
}

/// Whether adding `extra` hours keeps a faculty member within budget.
pub fn within_budget(faculty: &Faculty, booked: u32, extra: u32) -> bool {
    booked.saturating_add(extra) <= faculty.max_hours_per_week
}

/// Counts idle slots inside one day's occupancy pattern.
///
/// Only gaps strictly between the first and last occupied slot count.
pub fn idle_gaps(occupied: &[bool]) -> usize {
    let Some(first) = occupied.iter().position(|&o| o) else {
        return 0;
    };
    let last = occupied.iter().rposition(|&o| o).unwrap_or(first);
    occupied[first..=last].iter().filter(|&&o| !o).count()
}

/// Population variance of per-day hours.
///
/// Returns 0 for an empty slice.
pub fn load_variance(daily_hours: &[f64]) -> f64 {
    if daily_hours.is_empty() {
        return 0.0;
    }
    let n = daily_hours.len() as f64;
    let mean = daily_hours.iter().sum::<f64>() / n;
    daily_hours.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Room, SessionType};

    #[test]
    fn test_faculty_qualified() {
        let subject = Subject::theory("MATH", 3);
        let a = Division::new("A", 40);
        let b = Division::new("B", 40);

        let any = Faculty::new("F1", 20).with_subject("MATH");
        assert!(faculty_qualified(&any, &subject, &a));
        assert!(faculty_qualified(&any, &subject, &b));

        let only_a = Faculty::new("F2", 20).with_subject("MATH").with_division("A");
        assert!(faculty_qualified(&only_a, &subject, &a));
        assert!(!faculty_qualified(&only_a, &subject, &b));

        let other = Faculty::new("F3", 20).with_subject("PHY");
        assert!(!faculty_qualified(&other, &subject, &a));
    }

    #[test]
    fn test_room_suitable() {
        let theory = Subject::theory("T", 1);
        let lab = Subject::lab("L", 1, 2);
        let div = Division::new("A", 50);

        assert!(room_suitable(&Room::classroom("C", 60), &theory, &div));
        assert!(!room_suitable(&Room::classroom("C", 40), &theory, &div));
        assert!(!room_suitable(&Room::classroom("C", 60), &lab, &div));
        assert!(room_suitable(&Room::lab("L", 50), &lab, &div));
        assert!(room_suitable(
            &Room::new("AUD", crate::models::RoomType::Auditorium, 200),
            &Subject::new("X", SessionType::Tutorial, 1),
            &div
        ));
    }

    #[test]
    fn test_within_budget() {
        let f = Faculty::new("F", 4);
        assert!(within_budget(&f, 2, 2));
        assert!(!within_budget(&f, 3, 2));
        assert!(within_budget(&Faculty::new("G", 0), 0, 0));
    }

    #[test]
    fn test_idle_gaps() {
        assert_eq!(idle_gaps(&[]), 0);
        assert_eq!(idle_gaps(&[false, false]), 0);
        assert_eq!(idle_gaps(&[true, true, false]), 0);
        assert_eq!(idle_gaps(&[false, true, false, false, true, false]), 2);
        assert_eq!(idle_gaps(&[true, false, true, false, true]), 2);
    }

    #[test]
    fn test_load_variance() {
        assert_eq!(load_variance(&[]), 0.0);
        assert_eq!(load_variance(&[2.0, 2.0, 2.0]), 0.0);
        // mean 2, deviations 2 and -2
        assert!((load_variance(&[4.0, 0.0]) - 4.0).abs() < 1e-12);
    }
}
