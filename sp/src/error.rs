//! Store error types

use thiserror::Error;

/// Errors from store, scheduling and state operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or malformed field, unknown status token, unparseable date
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The persistence collaborator failed; nothing was applied
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("State manager channel closed")]
    Channel,
}

/// Result alias used throughout the library
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Task",
            id: id.into(),
        }
    }

    pub fn plan_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Plan",
            id: id.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::task_not_found("abc123-task-read");
        assert_eq!(err.to_string(), "Task not found: abc123-task-read");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_message() {
        let err = StoreError::validation("title must not be empty");
        assert!(err.to_string().contains("title must not be empty"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_rusqlite_error_becomes_persistence() {
        let err: StoreError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, StoreError::Persistence(_)));
    }
}
