//! Engine error type.
//!
//! Only conditions that prevent any schedule from being produced are
//! errors. Unresolved sessions and deadline truncation are reported as
//! warnings inside a successful result.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by the timetable engine.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// The requested division does not exist.
    #[error("unknown division '{0}'")]
    UnknownDivision(String),

    /// Nothing of the given entity kind is available for the requested scope.
    #[error("no {0} available for the requested scope")]
    EmptyScope(&'static str),

    /// The snapshot failed structural validation.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A run parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No strategy is registered under the given name.
    #[error("unknown algorithm '{0}'")]
    AlgorithmNotFound(String),

    /// Engine configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl TimetableError {
    /// Whether this error belongs to the input family (bad request data).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDivision(_)
                | Self::EmptyScope(_)
                | Self::InvalidInput(_)
                | Self::InvalidParameter(_)
        )
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TimetableError::UnknownDivision("Z".into()).to_string(),
            "unknown division 'Z'"
        );
        assert_eq!(
            TimetableError::EmptyScope("rooms").to_string(),
            "no rooms available for the requested scope"
        );
        let err = TimetableError::InvalidInput(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate room ID: R1"),
            ValidationError::new(ValidationErrorKind::InvalidTimeSlot, "Slot T1 ends before it starts"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid input: Duplicate room ID: R1; Slot T1 ends before it starts"
        );
    }

    #[test]
    fn test_input_classification() {
        assert!(TimetableError::EmptyScope("faculty").is_input_error());
        assert!(TimetableError::InvalidParameter("x".into()).is_input_error());
        assert!(!TimetableError::AlgorithmNotFound("x".into()).is_input_error());
    }
}
