//! Relationship handle.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::validation::{ValidationError, Validator};

use super::{Identity, Node, PropertyMap};

struct RelationshipState {
    start: Node,
    end: Node,
    rel_type: String,
    identity: Identity,
    attributes: PropertyMap,
    auto_indexing: bool,
    index_name: String,
    correlation_id: Option<usize>,
    validators: Vec<Arc<dyn Validator>>,
}

/// A typed, directed relationship between two nodes.
///
/// Holds handles to its endpoints, so a relationship constructed before its
/// endpoints are saved still resolves their correlation ids at build time.
/// Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct Relationship {
    state: Arc<Mutex<RelationshipState>>,
}

impl Relationship {
    /// A new, not-yet-persisted relationship from `start` to `end`.
    pub fn new(
        start: Node,
        end: Node,
        rel_type: impl Into<String>,
        attributes: PropertyMap,
    ) -> Self {
        Self::with_identity(Identity::New, start, end, rel_type, attributes)
    }

    /// A relationship that already exists on the server.
    pub fn persisted(
        id: u64,
        self_locator: impl Into<String>,
        start: Node,
        end: Node,
        rel_type: impl Into<String>,
        attributes: PropertyMap,
    ) -> Self {
        Self::with_identity(
            Identity::Persisted {
                id,
                self_locator: self_locator.into(),
            },
            start,
            end,
            rel_type,
            attributes,
        )
    }

    fn with_identity(
        identity: Identity,
        start: Node,
        end: Node,
        rel_type: impl Into<String>,
        attributes: PropertyMap,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(RelationshipState {
                start,
                end,
                rel_type: rel_type.into(),
                identity,
                attributes,
                auto_indexing: false,
                index_name: "relationship".to_string(),
                correlation_id: None,
                validators: Vec::new(),
            })),
        }
    }

    /// Override the index name; defaults to `relationship`.
    pub fn with_index_name(self, name: impl Into<String>) -> Self {
        self.lock().index_name = name.into();
        self
    }

    /// Enable or disable emission of index operations alongside saves.
    pub fn set_auto_indexing(&self, enabled: bool) {
        self.lock().auto_indexing = enabled;
    }

    /// Register a validation rule; rules run when the relationship is enlisted.
    pub fn add_validator(&self, validator: Arc<dyn Validator>) {
        self.lock().validators.push(validator);
    }

    /// Handle to the start node.
    pub fn start(&self) -> Node {
        self.lock().start.clone()
    }

    /// Handle to the end node.
    pub fn end(&self) -> Node {
        self.lock().end.clone()
    }

    /// The relationship type.
    pub fn rel_type(&self) -> String {
        self.lock().rel_type.clone()
    }

    /// Current identity state.
    pub fn identity(&self) -> Identity {
        self.lock().identity.clone()
    }

    /// Whether the relationship has no durable identifier yet.
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

    /// Snapshot of the relationship's attributes.
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

    /// Name of the index the relationship is written to.
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

    /// Record the durable identity assigned by the server.
    pub fn mark_persisted(&self, id: u64, self_locator: impl Into<String>) {
        self.lock().identity = Identity::Persisted {
            id,
            self_locator: self_locator.into(),
        };
    }

    /// Run the built-in rules and every registered validator, returning all
    /// violations found. The relationship type must be non-empty.
    pub fn validate(&self) -> Vec<ValidationError> {
        let (rel_type, attributes, validators) = {
            let state = self.lock();
            (
                state.rel_type.clone(),
                state.attributes.clone(),
                state.validators.clone(),
            )
        };

        let mut errors = Vec::new();
        if rel_type.trim().is_empty() {
            errors.push(ValidationError::attribute("type", "must not be empty"));
        }
        for validator in &validators {
            errors.extend(validator.validate(&attributes));
        }
        errors
    }

    /// Whether two handles refer to the same underlying relationship.
    pub fn same_as(&self, other: &Relationship) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn lock(&self) -> MutexGuard<'_, RelationshipState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Relationship")
            .field("rel_type", &state.rel_type)
            .field("identity", &state.identity)
            .field("attributes", &state.attributes)
            .field("correlation_id", &state.correlation_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoints() -> (Node, Node) {
        (Node::new(PropertyMap::new()), Node::new(PropertyMap::new()))
    }

    #[test]
    fn test_empty_type_fails_builtin_validation() {
        let (start, end) = endpoints();
        let rel = Relationship::new(start, end, "  ", PropertyMap::new());

        let errors = rel.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute.as_deref(), Some("type"));
    }

    #[test]
    fn test_endpoint_handles_are_shared_not_copied() {
        let (start, end) = endpoints();
        let rel = Relationship::new(start.clone(), end, "KNOWS", PropertyMap::new());

        start.assign_correlation_id(Some(4));
        assert_eq!(rel.start().correlation_id(), Some(4));
        assert!(rel.start().same_as(&start));
    }

    #[test]
    fn test_attributes_are_shared_across_clones() {
        let (start, end) = endpoints();
        let rel = Relationship::new(start, end, "KNOWS", PropertyMap::new());
        let other = rel.clone();

        rel.set_attribute("since", json!(2010));
        assert_eq!(other.attributes().get("since"), Some(&json!(2010)));
        assert!(rel.same_as(&other));
    }
}
