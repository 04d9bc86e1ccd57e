//! Error types for the batch client.

use crate::transport::TransportError;
use crate::validation::ValidationError;

/// Alias for Results returning [`BatchError`].
pub type BatchResult<T> = std::result::Result<T, BatchError>;

/// Top-level error type for the batch client.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// One or more models failed validation before being enlisted. The
    /// transaction is unchanged; fix the model and retry.
    #[error("transaction failure: one or more models did not validate: {}", join_errors(.errors))]
    Validation {
        /// The validation failures, in the order they were reported.
        errors: Vec<ValidationError>,
    },

    /// An operation referenced an entity that exists neither in this
    /// transaction nor on the server. Caller-ordering bug; the calls must be
    /// restructured. The transaction is unchanged.
    #[error("precondition failure: {0}")]
    Precondition(String),

    /// The transport failed while submitting the batch. Correlation state on
    /// the enlisted entities has already been cleared when this is raised.
    #[error("transaction failure: {0}")]
    Execution(#[from] TransportError),

    /// Failed to read a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration file.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl BatchError {
    /// Build a [`BatchError::Validation`] from collected failures.
    pub fn validation(errors: Vec<ValidationError>) -> Self {
        Self::Validation { errors }
    }

    /// Build a [`BatchError::Precondition`] with the given message.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_every_failure() {
        let err = BatchError::validation(vec![
            ValidationError::attribute("name", "is required"),
            ValidationError::model("too many attributes"),
        ]);
        let text = err.to_string();
        assert!(text.contains("did not validate"));
        assert!(text.contains("name: is required"));
        assert!(text.contains("too many attributes"));
    }

    #[test]
    fn test_execution_carries_the_transport_cause() {
        let err = BatchError::from(TransportError::new("connection refused"));
        assert!(matches!(err, BatchError::Execution(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
