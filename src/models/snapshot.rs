//! Immutable entity snapshots.
//!
//! The repository hands the engine one `EntitySnapshot` per generation
//! request. It is never mutated during a run and may be shared between
//! concurrent runs.

use serde::{Deserialize, Serialize};

use super::{Division, Faculty, Room, Subject, TimeSlot};

/// All entity records relevant to a generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySnapshot {
    #[serde(default)]
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl EntitySnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a division.
    pub fn with_division(mut self, division: Division) -> Self {
        self.divisions.push(division);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a faculty member.
    pub fn with_faculty(mut self, faculty: Faculty) -> Self {
        self.faculty.push(faculty);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds time slots.
    pub fn with_time_slots(mut self, slots: impl IntoIterator<Item = TimeSlot>) -> Self {
        self.time_slots.extend(slots);
        self
    }

    /// Finds a division by id.
    pub fn division(&self, id: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.id == id)
    }

    /// Finds a subject by id.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }
}
