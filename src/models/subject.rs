//! Subject (session type) model.
//!
//! A course taught as several session types (e.g., theory + lab) is stored
//! as several `Subject` records that share a `base_code`.

use serde::{Deserialize, Serialize};

/// Kind of session a subject is taught as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Theory,
    Lab,
    Tutorial,
}

/// One required recurring class component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Short code (e.g., "CS201-L").
    pub code: String,
    /// Shared code grouping session types of one course.
    #[serde(default)]
    pub base_code: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Session type.
    pub session_type: SessionType,
    /// Sessions required per week.
    pub hours: u32,
    /// Length of each session in hours (= consecutive grid slots).
    #[serde(default = "default_hours_per_session")]
    pub hours_per_session: u32,
}

fn default_hours_per_session() -> u32 {
    1
}

impl Subject {
    /// Creates a subject with one-hour sessions.
    pub fn new(id: impl Into<String>, session_type: SessionType, hours: u32) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            base_code: None,
            name: String::new(),
            session_type,
            hours,
            hours_per_session: 1,
        }
    }

    /// Creates a theory subject.
    pub fn theory(id: impl Into<String>, hours: u32) -> Self {
        Self::new(id, SessionType::Theory, hours)
    }

    /// Creates a lab subject with the given session length.
    pub fn lab(id: impl Into<String>, hours: u32, hours_per_session: u32) -> Self {
        Self::new(id, SessionType::Lab, hours).with_hours_per_session(hours_per_session)
    }

    /// Sets the code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the base code.
    pub fn with_base_code(mut self, base_code: impl Into<String>) -> Self {
        self.base_code = Some(base_code.into());
        self
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the session length in hours.
    pub fn with_hours_per_session(mut self, hours: u32) -> Self {
        self.hours_per_session = hours;
        self
    }

    /// Weekly teaching hours this subject costs a faculty member.
    pub fn weekly_hours(&self) -> u32 {
        self.hours * self.hours_per_session
    }

    /// Number of consecutive grid slots one session occupies.
    pub fn span(&self) -> usize {
        self.hours_per_session.max(1) as usize
    }

    /// Course grouping key: `base_code` if set, otherwise `code`.
    pub fn course_code(&self) -> &str {
        self.base_code.as_deref().unwrap_or(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_builder() {
        let s = Subject::lab("CS201-L", 1, 2)
            .with_code("CS201L")
            .with_base_code("CS201")
            .with_name("Data Structures Lab");
        assert_eq!(s.session_type, SessionType::Lab);
        assert_eq!(s.span(), 2);
        assert_eq!(s.weekly_hours(), 2);
        assert_eq!(s.course_code(), "CS201");
    }

    #[test]
    fn test_course_code_fallback() {
        let s = Subject::theory("MATH", 3);
        assert_eq!(s.course_code(), "MATH");
        assert_eq!(s.weekly_hours(), 3);
    }

    #[test]
    fn test_session_type_serde() {
        let json = serde_json::to_string(&SessionType::Tutorial).unwrap();
        assert_eq!(json, "\"tutorial\"");
    }

    #[test]
    fn test_default_hours_per_session() {
        let s: Subject = serde_json::from_str(
            r#"{"id":"S1","code":"S1","session_type":"theory","hours":2}"#,
        )
        .unwrap();
        assert_eq!(s.hours_per_session, 1);
        assert!(s.base_code.is_none());
    }
}
