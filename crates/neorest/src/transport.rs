//! Transport seam for submitting composite batch requests.

use crate::batch::{BatchOperation, OperationResult};

/// Executes the final composite request against the batch endpoint.
///
/// The batch core never inspects HTTP details such as status codes; a
/// transport either returns the parsed per-operation results or a
/// [`TransportError`]. Connection and session management belong entirely to
/// the implementation.
#[allow(async_fn_in_trait)]
pub trait BatchTransport: Send + Sync {
    /// Submit the ordered operation list as a single request.
    async fn submit(
        &self,
        operations: &[BatchOperation],
    ) -> Result<Vec<OperationResult>, TransportError>;
}

/// Failure reported by a transport while submitting a batch.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// A transport failure with a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A transport failure carrying its underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The transport's failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
