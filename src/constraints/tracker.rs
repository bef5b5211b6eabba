//! Per-candidate resource occupancy.
//!
//! A `ResourceTracker` answers "is this faculty / room / division free in
//! this grid slot?" in O(1). One tracker is created for each candidate
//! construction, repair or evaluation pass and dropped afterwards; it is
//! never shared between candidates, so parallel evaluation needs no locks.

use std::collections::HashMap;

/// Kind of occupiable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Faculty,
    Room,
    Division,
}

type Key = (ResourceKind, usize, usize, usize);

/// Occupancy map keyed by `(kind, entity, day, slot)`.
///
/// Each occupied key remembers the first entry (gene index) that took it.
/// Faculty teaching hours are accumulated alongside.
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
    occupied: HashMap<Key, usize>,
    faculty_hours: HashMap<usize, u32>,
}

impl ResourceTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the key is unoccupied.
    #[inline]
    pub fn is_free(&self, kind: ResourceKind, id: usize, day: usize, slot: usize) -> bool {
        !self.occupied.contains_key(&(kind, id, day, slot))
    }

    /// Entry currently holding the key.
    #[inline]
    pub fn occupant(&self, kind: ResourceKind, id: usize, day: usize, slot: usize) -> Option<usize> {
        self.occupied.get(&(kind, id, day, slot)).copied()
    }

    /// Records `entry` on the key.
    ///
    /// Returns the previous occupant if the key was already taken; the
    /// previous occupant keeps the key in that case.
    pub fn occupy(
        &mut self,
        kind: ResourceKind,
        id: usize,
        day: usize,
        slot: usize,
        entry: usize,
    ) -> Option<usize> {
        match self.occupied.get(&(kind, id, day, slot)) {
            Some(&existing) => Some(existing),
            None => {
                self.occupied.insert((kind, id, day, slot), entry);
                None
            }
        }
    }

    /// Frees the key.
    pub fn release(&mut self, kind: ResourceKind, id: usize, day: usize, slot: usize) {
        self.occupied.remove(&(kind, id, day, slot));
    }

    /// Hours booked for a faculty member so far.
    #[inline]
    pub fn hours(&self, faculty: usize) -> u32 {
        self.faculty_hours.get(&faculty).copied().unwrap_or(0)
    }

    /// Adds teaching hours to a faculty member.
    pub fn add_hours(&mut self, faculty: usize, hours: u32) {
        *self.faculty_hours.entry(faculty).or_insert(0) += hours;
    }

    /// Removes teaching hours from a faculty member.
    pub fn remove_hours(&mut self, faculty: usize, hours: u32) {
        if let Some(h) = self.faculty_hours.get_mut(&faculty) {
            *h = h.saturating_sub(hours);
        }
    }

    /// Number of occupied keys.
    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    /// Whether nothing is occupied.
    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }
}
