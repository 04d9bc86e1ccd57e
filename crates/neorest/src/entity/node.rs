//! Node handle.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::validation::{ValidationError, Validator};

use super::{Identity, PropertyMap};

struct NodeState {
    identity: Identity,
    attributes: PropertyMap,
    auto_indexing: bool,
    index_name: String,
    correlation_id: Option<usize>,
    validators: Vec<Arc<dyn Validator>>,
}

/// A graph node.
///
/// Cloning is cheap and clones share state: a node enlisted in a transaction
/// observes correlation changes through every handle, which is what lets a
/// relationship saved later in the same batch reference it by placeholder.
#[derive(Clone)]
pub struct Node {
    state: Arc<Mutex<NodeState>>,
}

impl Node {
    /// A new, not-yet-persisted node.
    pub fn new(attributes: PropertyMap) -> Self {
        Self::with_identity(Identity::New, attributes)
    }

    /// A node that already exists on the server.
    pub fn persisted(id: u64, self_locator: impl Into<String>, attributes: PropertyMap) -> Self {
        Self::with_identity(
            Identity::Persisted {
                id,
                self_locator: self_locator.into(),
            },
            attributes,
        )
    }

    fn with_identity(identity: Identity, attributes: PropertyMap) -> Self {
        Self {
            state: Arc::new(Mutex::new(NodeState {
                identity,
                attributes,
                auto_indexing: false,
                index_name: "node".to_string(),
                correlation_id: None,
                validators: Vec::new(),
            })),
        }
    }

    /// Override the index name; defaults to `node`.
    pub fn with_index_name(self, name: impl Into<String>) -> Self {
        self.lock().index_name = name.into();
        self
    }

    /// Enable or disable emission of index operations alongside saves.
    pub fn set_auto_indexing(&self, enabled: bool) {
        self.lock().auto_indexing = enabled;
    }

    /// Register a validation rule; rules run when the node is enlisted.
    pub fn add_validator(&self, validator: Arc<dyn Validator>) {
        self.lock().validators.push(validator);
    }

    /// Current identity state.
    pub fn identity(&self) -> Identity {
        self.lock().identity.clone()
    }

    /// Whether the node has no durable identifier yet.
    pub fn is_new(&self) -> bool {
        self.lock().identity.is_new()
    }

    /// Server-assigned identifier, if persisted.
    pub fn durable_id(&self) -> Option<u64> {
        self.lock().identity.durable_id()
    }

    /// Durable self-locator URL, if persisted.
    pub fn self_locator(&self) -> Option<String> {
        self.lock().identity.self_locator().map(str::to_string)
    }

    /// Snapshot of the node's attributes.
    pub fn attributes(&self) -> PropertyMap {
        self.lock().attributes.clone()
    }

    /// Set or replace a single attribute.
    pub fn set_attribute(&self, key: impl Into<String>, value: Value) {
        self.lock().attributes.insert(key.into(), value);
    }

    /// Whether index operations are emitted alongside saves and updates.
    pub fn auto_indexing(&self) -> bool {
        self.lock().auto_indexing
    }

    /// Name of the index the node is written to.
    pub fn index_name(&self) -> String {
        self.lock().index_name.clone()
    }

    /// The transaction-local correlation id, while enlisted.
    pub fn correlation_id(&self) -> Option<usize> {
        self.lock().correlation_id
    }

    pub(crate) fn assign_correlation_id(&self, id: Option<usize>) {
        self.lock().correlation_id = id;
    }

    /// Record the durable identity assigned by the server, e.g. after reading
    /// a batch response.
    pub fn mark_persisted(&self, id: u64, self_locator: impl Into<String>) {
        self.lock().identity = Identity::Persisted {
            id,
            self_locator: self_locator.into(),
        };
    }

    /// Run every registered validator, returning all violations found.
    pub fn validate(&self) -> Vec<ValidationError> {
        let (attributes, validators) = {
            let state = self.lock();
            (state.attributes.clone(), state.validators.clone())
        };
        validators
            .iter()
            .flat_map(|validator| validator.validate(&attributes))
            .collect()
    }

    /// Whether two handles refer to the same underlying node.
    pub fn same_as(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn lock(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Node")
            .field("identity", &state.identity)
            .field("attributes", &state.attributes)
            .field("correlation_id", &state.correlation_id)
            .finish()
    }
}
