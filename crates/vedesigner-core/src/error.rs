//! Error types for the wizard library.
//!
//! Every failure the wizard can observe is a [`PlannerError`]. Callers that
//! need to decide *what to do* with a failure (redirect, block navigation,
//! force a new login, show a notice) ask [`PlannerError::outcome`].

use std::path::PathBuf;

use thiserror::Error;

use crate::form::ValidationErrors;

/// Comprehensive error type for all wizard operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// No plan id was supplied by the routing context
    #[error("No plan id given")]
    MissingPlanId,
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: String },
    /// Step not found for the given key
    #[error("Step '{key}' not found in plan")]
    StepNotFound { key: String },
    /// Client-side form validation failed
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    /// The backend rejected the access token
    #[error("Not authorized, please log in again")]
    Unauthorized,
    /// The backend refused the operation for this user
    #[error("Permission denied: {message}")]
    Forbidden { message: String },
    /// Any other non-success HTTP status
    #[error("Server responded with status {status}: {message}")]
    Http { status: u16, message: String },
    /// Transport level failure (DNS, connect, timeout, body decoding)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// What the wizard does with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOutcome {
    /// Silently route to the plan overview.
    Redirect,
    /// Stay on the page and show field-level messages; nothing was sent.
    BlockNavigation,
    /// Hand over to the login flow.
    Reauthenticate,
    /// Show a transient notice; the action is not retried.
    Notify,
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a rusqlite error with a message.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.to_string(),
            source,
        }
    }

    /// Classifies the error into the action the wizard takes.
    pub fn outcome(&self) -> ErrorOutcome {
        match self {
            PlannerError::MissingPlanId => ErrorOutcome::Redirect,
            PlannerError::Validation(_) => ErrorOutcome::BlockNavigation,
            PlannerError::Unauthorized => ErrorOutcome::Reauthenticate,
            _ => ErrorOutcome::Notify,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::database_error(message, e))
    }
}

/// Extension trait for reqwest Results.
pub trait NetworkResultExt<T> {
    /// Map transport errors with a message.
    fn net_context(self, message: &str) -> Result<T>;
}

impl<T> NetworkResultExt<T> for std::result::Result<T, reqwest::Error> {
    fn net_context(self, message: &str) -> Result<T> {
        self.map_err(|source| PlannerError::Network {
            message: format!("{message}: {source}"),
            source,
        })
    }
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_taxonomy() {
        assert_eq!(PlannerError::MissingPlanId.outcome(), ErrorOutcome::Redirect);
        assert_eq!(
            PlannerError::Validation(ValidationErrors::default()).outcome(),
            ErrorOutcome::BlockNavigation
        );
        assert_eq!(PlannerError::Unauthorized.outcome(), ErrorOutcome::Reauthenticate);
        assert_eq!(
            PlannerError::Forbidden {
                message: "no write access".to_string()
            }
            .outcome(),
            ErrorOutcome::Notify
        );
        assert_eq!(
            PlannerError::Http {
                status: 500,
                message: String::new()
            }
            .outcome(),
            ErrorOutcome::Notify
        );
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = PlannerError::invalid_input("page").with_reason("unknown page 'foo'");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'page': unknown page 'foo'"
        );
    }
}
