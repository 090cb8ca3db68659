//! Application error types.
//!
//! The dispatch core never propagates errors across the boundaries of
//! `dispatch`/`process_all` — delivery failures there surface as a status
//! plus a boolean plus a log line. `AppError` covers the layers around the
//! core: the persistence port, the schedule service, and startup wiring.

use thiserror::Error;

/// Application-wide error type for the non-dispatch layers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_field() {
        let err = AppError::NotFound {
            entity: "notification_schedule".to_string(),
            field: "id".to_string(),
            value: "42".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Resource not found: notification_schedule with id=42"
        );
    }

    #[test]
    fn anyhow_converts_to_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
