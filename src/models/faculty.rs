//! Faculty model.
//!
//! Faculty members teach subjects to divisions within their free periods
//! and up to a weekly hour budget.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{Day, TimeSlot};

/// A teaching staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Institutional employee number.
    #[serde(default)]
    pub employee_id: String,
    /// Department.
    #[serde(default)]
    pub department: String,
    /// Weekly teaching hour budget.
    pub max_hours_per_week: u32,
    /// Subjects this faculty may teach.
    #[serde(default)]
    pub subject_ids: Vec<String>,
    /// Divisions this faculty may teach. Empty = any division.
    #[serde(default)]
    pub division_ids: Vec<String>,
    /// Free periods: day → slot start times.
    #[serde(default)]
    pub availability: BTreeMap<Day, BTreeSet<NaiveTime>>,
}

impl Faculty {
    /// Creates a faculty member with no availability.
    pub fn new(id: impl Into<String>, max_hours_per_week: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            employee_id: String::new(),
            department: String::new(),
            max_hours_per_week,
            subject_ids: Vec::new(),
            division_ids: Vec::new(),
            availability: BTreeMap::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the employee id.
    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = employee_id.into();
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Adds a teachable subject.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_ids.push(subject_id.into());
        self
    }

    /// Restricts teaching to a division (may be called repeatedly).
    pub fn with_division(mut self, division_id: impl Into<String>) -> Self {
        self.division_ids.push(division_id.into());
        self
    }

    /// Marks a slot start as free.
    pub fn with_available(mut self, day: Day, start: NaiveTime) -> Self {
        self.availability.entry(day).or_default().insert(start);
        self
    }

    /// Marks every given slot as free.
    pub fn available_for_slots(mut self, slots: &[TimeSlot]) -> Self {
        for slot in slots {
            self.availability.entry(slot.day).or_default().insert(slot.start);
        }
        self
    }

    /// Whether this faculty lists the subject.
    pub fn teaches(&self, subject_id: &str) -> bool {
        self.subject_ids.iter().any(|s| s == subject_id)
    }

    /// Whether this faculty may teach the division.
    pub fn serves_division(&self, division_id: &str) -> bool {
        self.division_ids.is_empty() || self.division_ids.iter().any(|d| d == division_id)
    }

    /// Whether the slot starting at `start` on `day` is a free period.
    pub fn is_available(&self, day: Day, start: NaiveTime) -> bool {
        self.availability
            .get(&day)
            .is_some_and(|starts| starts.contains(&start))
    }
}
