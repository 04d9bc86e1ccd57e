//! Test fixtures: a recording transport double and entity helpers.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use neorest::{BatchOperation, BatchTransport, Node, OperationResult, PropertyMap, TransportError};

/// Transport double that records every submitted batch and can be set to
/// fail. Clones share state, mirroring how a real client handle would be
/// cloned into each transaction.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    batches: Vec<Vec<BatchOperation>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that refuses every submission.
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.inner.lock().unwrap().fail = true;
        transport
    }

    /// Batches submitted so far.
    pub fn batches(&self) -> Vec<Vec<BatchOperation>> {
        self.inner.lock().unwrap().batches.clone()
    }

    /// Number of submissions attempted against this transport.
    pub fn submission_count(&self) -> usize {
        self.inner.lock().unwrap().batches.len()
    }
}

impl BatchTransport for RecordingTransport {
    async fn submit(
        &self,
        operations: &[BatchOperation],
    ) -> Result<Vec<OperationResult>, TransportError> {
        let mut state = self.inner.lock().unwrap();
        if state.fail {
            return Err(TransportError::new("connection refused"));
        }
        state.batches.push(operations.to_vec());
        Ok(operations
            .iter()
            .map(|op| OperationResult {
                id: op.id,
                from: Some(op.to.clone()),
                location: None,
                body: None,
            })
            .collect())
    }
}

/// Attribute map from key/value pairs.
pub fn attrs(pairs: &[(&str, Value)]) -> PropertyMap {
    pairs
        .iter()
        .cloned()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// A persisted node with the locator a local server would return for it.
pub fn persisted_node(id: u64, pairs: &[(&str, Value)]) -> Node {
    Node::persisted(id, node_locator(id), attrs(pairs))
}

/// Durable self-locator for a node id on a local server.
pub fn node_locator(id: u64) -> String {
    format!("http://localhost:7474/db/data/node/{id}")
}
