//! Domain error types.

use thiserror::Error;

/// Errors raised by domain rules, independent of transport or storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No checklist template exists for the requested standard.
    #[error("Unsupported ISO standard: {0}")]
    UnsupportedStandard(String),

    /// A lifecycle edge that the transition table does not allow.
    #[error("Invalid {entity} status transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn invalid_transition(
        entity: &'static str,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        DomainError::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = DomainError::invalid_transition("audit", "completed", "scheduled");
        assert_eq!(
            err.to_string(),
            "Invalid audit status transition: completed -> scheduled"
        );
    }

    #[test]
    fn test_unsupported_standard_message() {
        let err = DomainError::UnsupportedStandard("ISO 14001".into());
        assert_eq!(err.to_string(), "Unsupported ISO standard: ISO 14001");
    }
}
