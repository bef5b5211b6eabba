//! Timetable (solution) model.
//!
//! A timetable is the list of placed sessions handed back to the caller,
//! together with the hard-rule conflicts found in it. Entries reference
//! entities by id and carry display fields so collaborators can render
//! them without another lookup.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{Day, SessionType};

/// One placed session.
///
/// `faculty_id` / `room_id` are `None` when the session could not be
/// resolved (unresolved placeholder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Division attending the session.
    pub division_id: String,
    /// Division display name.
    pub division_name: String,
    /// Day of the week.
    pub day: Day,
    /// Start of the first covered slot.
    pub start: NaiveTime,
    /// End of the last covered slot.
    pub end: NaiveTime,
    /// Subject taught.
    pub subject_id: String,
    /// Subject code.
    pub subject_code: String,
    /// Subject name.
    pub subject_name: String,
    /// Assigned faculty.
    pub faculty_id: Option<String>,
    /// Assigned faculty display name.
    pub faculty_name: Option<String>,
    /// Assigned room.
    pub room_id: Option<String>,
    /// Assigned room number.
    pub room_number: Option<String>,
    /// Assigned room building.
    pub building: Option<String>,
    /// Session type.
    pub session_type: SessionType,
}

impl ScheduleEntry {
    /// Whether faculty and room are both assigned.
    pub fn is_resolved(&self) -> bool {
        self.faculty_id.is_some() && self.room_id.is_some()
    }

    /// Session length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Classification of hard-rule conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    /// Faculty booked twice in one slot.
    FacultyClash,
    /// Room booked twice in one slot.
    RoomClash,
    /// Division attending two sessions in one slot.
    DivisionClash,
    /// Faculty assigned more weekly hours than its budget.
    FacultyOverload,
    /// Faculty placed outside its free periods (or not qualified).
    FacultyUnavailable,
    /// Room too small or of the wrong type.
    RoomUnsuitable,
    /// Session left with a faculty or room placeholder.
    UnresolvedSession,
    /// Number of sessions for a division/subject differs from its hours.
    SessionCountMismatch,
}

/// A concrete hard-rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    /// Conflict classification.
    pub kind: ConflictKind,
    /// Day, when the conflict is tied to a slot.
    pub day: Option<Day>,
    /// Slot start, when the conflict is tied to a slot.
    pub slot: Option<NaiveTime>,
    /// Entity ids involved (division, subject, faculty, room).
    pub entity_ids: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

impl ConflictRecord {
    /// Creates a conflict tied to a grid cell.
    pub fn at(
        kind: ConflictKind,
        day: Day,
        slot: NaiveTime,
        entity_ids: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            day: Some(day),
            slot: Some(slot),
            entity_ids,
            message: message.into(),
        }
    }

    /// Creates a conflict that spans the whole week.
    pub fn weekly(kind: ConflictKind, entity_ids: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            day: None,
            slot: None,
            entity_ids,
            message: message.into(),
        }
    }
}

/// Counts conflicts of one kind.
pub fn count_kind(conflicts: &[ConflictRecord], kind: ConflictKind) -> usize {
    conflicts.iter().filter(|c| c.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn entry(faculty: Option<&str>, room: Option<&str>) -> ScheduleEntry {
        ScheduleEntry {
            division_id: "A".into(),
            division_name: "Division A".into(),
            day: Day::Monday,
            start: t(9),
            end: t(11),
            subject_id: "LAB".into(),
            subject_code: "LAB".into(),
            subject_name: "Lab".into(),
            faculty_id: faculty.map(String::from),
            faculty_name: None,
            room_id: room.map(String::from),
            room_number: None,
            building: None,
            session_type: SessionType::Lab,
        }
    }

    #[test]
    fn test_entry_resolution() {
        assert!(entry(Some("F1"), Some("L1")).is_resolved());
        assert!(!entry(None, Some("L1")).is_resolved());
        assert!(!entry(Some("F1"), None).is_resolved());
        assert_eq!(entry(None, None).duration_minutes(), 120);
    }

    #[test]
    fn test_conflict_kind_serde() {
        let json = serde_json::to_string(&ConflictKind::FacultyOverload).unwrap();
        assert_eq!(json, "\"facultyOverload\"");
    }

    #[test]
    fn test_conflict_factories() {
        let c = ConflictRecord::at(
            ConflictKind::RoomClash,
            Day::Tuesday,
            t(10),
            vec!["R1".into()],
            "double booked",
        );
        assert_eq!(c.day, Some(Day::Tuesday));
        let w = ConflictRecord::weekly(ConflictKind::FacultyOverload, vec!["F1".into()], "over");
        assert!(w.day.is_none() && w.slot.is_none());
        assert_eq!(count_kind(&[c, w], ConflictKind::RoomClash), 1);
    }
}
