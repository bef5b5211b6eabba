//! Room model.
//!
//! Rooms are the spatial resource of a timetable. Suitability for a
//! session depends on the room type and on seating capacity.

use serde::{Deserialize, Serialize};

use super::SessionType;

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Classroom,
    Lab,
    Auditorium,
}

impl RoomType {
    /// Whether a session of the given type may be held in this room type.
    ///
    /// Labs need lab rooms; theory and tutorials use classrooms or auditoriums.
    pub fn hosts(self, session_type: SessionType) -> bool {
        match session_type {
            SessionType::Lab => self == RoomType::Lab,
            SessionType::Theory | SessionType::Tutorial => {
                matches!(self, RoomType::Classroom | RoomType::Auditorium)
            }
        }
    }
}

/// A bookable room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Room number as printed on the door.
    #[serde(default)]
    pub number: String,
    /// Building name.
    #[serde(default)]
    pub building: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Room type.
    pub room_type: RoomType,
    /// Facility tags (e.g., "projector").
    #[serde(default)]
    pub facilities: Vec<String>,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl Into<String>, room_type: RoomType, capacity: u32) -> Self {
        let id = id.into();
        Self {
            number: id.clone(),
            id,
            building: String::new(),
            capacity,
            room_type,
            facilities: Vec::new(),
        }
    }

    /// Creates a classroom.
    pub fn classroom(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, RoomType::Classroom, capacity)
    }

    /// Creates a lab.
    pub fn lab(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, RoomType::Lab, capacity)
    }

    /// Sets the room number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Sets the building.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = building.into();
        self
    }

    /// Adds a facility tag.
    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facilities.push(facility.into());
        self
    }

    /// Whether the room can hold `students` for a session of `session_type`.
    pub fn suits(&self, session_type: SessionType, students: u32) -> bool {
        self.capacity >= students && self.room_type.hosts(session_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::lab("L1", 30)
            .with_number("B-204")
            .with_building("Block B")
            .with_facility("computers");
        assert_eq!(r.number, "B-204");
        assert_eq!(r.room_type, RoomType::Lab);
        assert_eq!(r.facilities, vec!["computers".to_string()]);
    }

    #[test]
    fn test_type_compatibility() {
        assert!(RoomType::Lab.hosts(SessionType::Lab));
        assert!(!RoomType::Classroom.hosts(SessionType::Lab));
        assert!(RoomType::Classroom.hosts(SessionType::Theory));
        assert!(RoomType::Auditorium.hosts(SessionType::Tutorial));
        assert!(!RoomType::Lab.hosts(SessionType::Theory));
    }

    #[test]
    fn test_suits_capacity() {
        let r = Room::classroom("C1", 60);
        assert!(r.suits(SessionType::Theory, 60));
        assert!(!r.suits(SessionType::Theory, 61));
        assert!(!r.suits(SessionType::Lab, 10));
    }
}
