//! Division (student cohort) model.

use serde::{Deserialize, Serialize};

/// A cohort of students that needs a weekly timetable.
///
/// Each assigned subject expands into `subject.hours` required sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    /// Unique division identifier.
    pub id: String,
    /// Human-readable name (e.g., "SE-A").
    pub name: String,
    /// Academic year label.
    #[serde(default)]
    pub year: String,
    /// Number of enrolled students.
    pub student_count: u32,
    /// Subjects this division must attend.
    #[serde(default)]
    pub subject_ids: Vec<String>,
}

impl Division {
    /// Creates a new division.
    pub fn new(id: impl Into<String>, student_count: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            year: String::new(),
            student_count,
            subject_ids: Vec::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the academic year.
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    /// Assigns a subject.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_ids.push(subject_id.into());
        self
    }

    /// Whether the division attends the given subject.
    pub fn has_subject(&self, subject_id: &str) -> bool {
        self.subject_ids.iter().any(|s| s == subject_id)
    }
}
