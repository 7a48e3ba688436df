// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// True for errors raised before any query ran (bad identifier, missing field)
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::Domain(_))
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// (orphan rule: AppError cannot implement From<sqlx::Error> here)

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_domain_error_is_validation() {
        let err: AppError = DomainError::MissingField("password").into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_conflict_is_not_validation() {
        let err = AppError::Conflict("Queue with name Test already exists".to_string());
        assert!(!err.is_validation());
    }
}
