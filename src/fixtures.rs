//! Shared test data.

use crate::config::PenaltyWeights;
use crate::models::{weekday_hourly_grid, Division, EntitySnapshot, Faculty, Room, Subject};
use crate::problem::TimetableProblem;

/// One division, one faculty member, a theory subject (3 x 1h) and a lab
/// (1 x 2h) on a Monday-Friday 09:00-17:00 grid.
pub(crate) fn single_division() -> EntitySnapshot {
    single_division_with_budget(20)
}

/// Same as [`single_division`] with a custom weekly budget for `F1`.
pub(crate) fn single_division_with_budget(max_hours: u32) -> EntitySnapshot {
    let slots = weekday_hourly_grid(9, 17);
    EntitySnapshot::new()
        .with_division(
            Division::new("A", 50)
                .with_name("First Year A")
                .with_subject("TH")
                .with_subject("LB"),
        )
        .with_subject(
            Subject::theory("TH", 3)
                .with_code("TH101")
                .with_name("Theory"),
        )
        .with_subject(Subject::lab("LB", 1, 2).with_code("LB101").with_name("Lab"))
        .with_faculty(
            Faculty::new("F1", max_hours)
                .with_name("Dr. One")
                .with_subject("TH")
                .with_subject("LB")
                .available_for_slots(&slots),
        )
        .with_room(Room::classroom("C1", 60).with_number("101"))
        .with_room(Room::lab("L1", 60).with_number("L-1"))
        .with_time_slots(slots)
}

/// Two divisions sharing two faculty members and three rooms.
pub(crate) fn two_divisions() -> EntitySnapshot {
    let slots = weekday_hourly_grid(9, 17);
    EntitySnapshot::new()
        .with_division(Division::new("A", 40).with_subject("MATH").with_subject("PHY"))
        .with_division(Division::new("B", 40).with_subject("MATH").with_subject("CHEM"))
        .with_subject(Subject::theory("MATH", 3).with_code("MA101"))
        .with_subject(Subject::theory("PHY", 2).with_code("PH101"))
        .with_subject(Subject::lab("CHEM", 1, 2).with_code("CH101"))
        .with_faculty(
            Faculty::new("F1", 20)
                .with_subject("MATH")
                .with_subject("PHY")
                .available_for_slots(&slots),
        )
        .with_faculty(
            Faculty::new("F2", 20)
                .with_subject("MATH")
                .with_subject("CHEM")
                .available_for_slots(&slots),
        )
        .with_room(Room::classroom("C1", 40))
        .with_room(Room::classroom("C2", 45))
        .with_room(Room::lab("L1", 40))
        .with_time_slots(slots)
}

/// Builds a whole-snapshot problem with default weights.
pub(crate) fn problem(snapshot: EntitySnapshot) -> TimetableProblem {
    match TimetableProblem::new(snapshot, None, PenaltyWeights::default()) {
        Ok(problem) => problem,
        Err(e) => panic!("fixture problem must build: {e}"),
    }
}
