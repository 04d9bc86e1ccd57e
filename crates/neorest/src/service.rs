//! Service entry point: connection settings plus the transport batches are
//! submitted through.

use crate::batch::BatchTransaction;
use crate::config::GraphConfig;
use crate::transport::BatchTransport;

/// A configured graph database service that hands out batch transactions.
///
/// The transport is an explicit constructor dependency — there is no shared
/// default instance — and the service clones it into each transaction it
/// creates.
#[derive(Debug, Clone)]
pub struct GraphService<T> {
    config: GraphConfig,
    transport: T,
}

impl<T> GraphService<T> {
    /// Create a service from settings and a transport.
    pub fn new(config: GraphConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Connection settings.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }
}

impl<T: BatchTransport + Clone> GraphService<T> {
    /// Start a fresh batch transaction.
    pub fn batch(&self) -> BatchTransaction<T> {
        tracing::debug!(endpoint = %self.config.batch_endpoint(), "creating batch transaction");
        BatchTransaction::new(self.transport.clone())
    }
}
