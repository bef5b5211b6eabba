//! Input validation for timetable snapshots.
//!
//! Checks structural integrity of the entity records before any search
//! work starts. Detects:
//! - Duplicate IDs
//! - Division/faculty references to unknown subjects or divisions
//! - Malformed or overlapping time slots
//! - Subjects that require no time
//!
//! All problems are collected rather than stopping at the first one, so a
//! caller can fix the whole snapshot in one pass.

use std::collections::HashSet;

use crate::models::EntitySnapshot;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A division or faculty member references a subject that doesn't exist.
    InvalidSubjectReference,
    /// A faculty member references a division that doesn't exist.
    InvalidDivisionReference,
    /// A time slot ends before it starts or overlaps another slot.
    InvalidTimeSlot,
    /// A subject has zero weekly sessions or zero session length.
    InvalidSubject,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn check_unique<'a>(
    label: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
    seen
}

/// Validates an entity snapshot.
///
/// Checks:
/// 1. No duplicate IDs per entity kind
/// 2. Division subject references exist
/// 3. Faculty subject and division references exist
/// 4. Every time slot ends after it starts
/// 5. No two slots on the same day overlap
/// 6. Every subject has `hours > 0` and `hours_per_session > 0`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(snapshot: &EntitySnapshot) -> ValidationResult {
    let mut errors = Vec::new();

    let division_ids = check_unique(
        "division",
        snapshot.divisions.iter().map(|d| d.id.as_str()),
        &mut errors,
    );
    let subject_ids = check_unique(
        "subject",
        snapshot.subjects.iter().map(|s| s.id.as_str()),
        &mut errors,
    );
    check_unique(
        "faculty",
        snapshot.faculty.iter().map(|f| f.id.as_str()),
        &mut errors,
    );
    check_unique(
        "room",
        snapshot.rooms.iter().map(|r| r.id.as_str()),
        &mut errors,
    );
    check_unique(
        "time slot",
        snapshot.time_slots.iter().map(|t| t.id.as_str()),
        &mut errors,
    );

    for division in &snapshot.divisions {
        for subject_id in &division.subject_ids {
            if !subject_ids.contains(subject_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSubjectReference,
                    format!(
                        "Division '{}' references unknown subject '{}'",
                        division.id, subject_id
                    ),
                ));
            }
        }
    }

    for faculty in &snapshot.faculty {
        for subject_id in &faculty.subject_ids {
            if !subject_ids.contains(subject_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSubjectReference,
                    format!(
                        "Faculty '{}' references unknown subject '{}'",
                        faculty.id, subject_id
                    ),
                ));
            }
        }
        for division_id in &faculty.division_ids {
            if !division_ids.contains(division_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDivisionReference,
                    format!(
                        "Faculty '{}' references unknown division '{}'",
                        faculty.id, division_id
                    ),
                ));
            }
        }
    }

    for subject in &snapshot.subjects {
        if subject.hours == 0 || subject.hours_per_session == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSubject,
                format!(
                    "Subject '{}' must have positive hours and hours per session",
                    subject.id
                ),
            ));
        }
    }

    for (i, slot) in snapshot.time_slots.iter().enumerate() {
        if slot.end <= slot.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeSlot,
                format!("Time slot '{}' ends before it starts", slot.id),
            ));
            continue;
        }
        for other in &snapshot.time_slots[i + 1..] {
            if other.end > other.start && slot.overlaps(other) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimeSlot,
                    format!("Time slots '{}' and '{}' overlap", slot.id, other.id),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        weekday_hourly_grid, Day, Division, Faculty, Room, Subject, TimeSlot,
    };
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample_snapshot() -> EntitySnapshot {
        EntitySnapshot::new()
            .with_division(Division::new("A", 40).with_subject("S1").with_subject("S2"))
            .with_subject(Subject::theory("S1", 3))
            .with_subject(Subject::lab("S2", 1, 2))
            .with_faculty(Faculty::new("F1", 20).with_subject("S1").with_division("A"))
            .with_room(Room::classroom("C1", 40))
            .with_room(Room::lab("L1", 40))
            .with_time_slots(weekday_hourly_grid(9, 17))
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_snapshot(&sample_snapshot()).is_ok());
    }

    #[test]
    fn test_duplicate_room_id() {
        let snap = sample_snapshot().with_room(Room::classroom("C1", 10));
        let errors = validate_snapshot(&snap).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("room")));
    }

    #[test]
    fn test_unknown_subject_reference() {
        let snap = sample_snapshot().with_division(Division::new("B", 10).with_subject("NOPE"));
        let errors = validate_snapshot(&snap).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidSubjectReference));
    }

    #[test]
    fn test_unknown_division_reference() {
        let snap = sample_snapshot().with_faculty(Faculty::new("F2", 5).with_division("Z"));
        let errors = validate_snapshot(&snap).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidDivisionReference));
    }

    #[test]
    fn test_inverted_time_slot() {
        let snap = sample_snapshot().with_time_slots([TimeSlot::new(
            "bad",
            Day::Saturday,
            t(11, 0),
            t(10, 0),
        )]);
        let errors = validate_snapshot(&snap).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidTimeSlot);
    }

    #[test]
    fn test_overlapping_time_slots() {
        let snap = sample_snapshot().with_time_slots([TimeSlot::new(
            "half",
            Day::Monday,
            t(9, 30),
            t(10, 30),
        )]);
        let errors = validate_snapshot(&snap).unwrap_err();
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidTimeSlot));
        assert_eq!(errors.len(), 2); // overlaps Mon-09 and Mon-10
    }

    #[test]
    fn test_zero_hour_subject() {
        let snap = sample_snapshot().with_subject(Subject::theory("S3", 0));
        let errors = validate_snapshot(&snap).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidSubject));
    }

    #[test]
    fn test_multiple_errors() {
        let snap = sample_snapshot()
            .with_subject(Subject::theory("S1", 1))
            .with_division(Division::new("B", 10).with_subject("UNKNOWN"));
        let errors = validate_snapshot(&snap).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
