//! Graph entities: nodes, relationships, and their identity state.
//!
//! [`Node`] and [`Relationship`] are cheaply clonable shared handles — a
//! relationship holds handles to its endpoint nodes, and a transaction holds
//! handles to everything it enlists, so correlation state assigned by the
//! transaction is visible through every handle the caller kept.

mod node;
mod relationship;

pub use node::Node;
pub use relationship::Relationship;

use serde_json::Value;

use crate::validation::ValidationError;

/// Attribute map carried by nodes and relationships.
pub type PropertyMap = serde_json::Map<String, Value>;

/// Identity state of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Not yet persisted; no durable identifier exists.
    New,
    /// Persisted, with the server-assigned id and the durable self-locator
    /// URL the server returned for it.
    Persisted {
        /// Server-assigned identifier.
        id: u64,
        /// Full resource locator of the entity.
        self_locator: String,
    },
}

impl Identity {
    /// Whether the entity has no durable identifier yet.
    pub fn is_new(&self) -> bool {
        matches!(self, Identity::New)
    }

    /// The server-assigned identifier, if persisted.
    pub fn durable_id(&self) -> Option<u64> {
        match self {
            Identity::New => None,
            Identity::Persisted { id, .. } => Some(*id),
        }
    }

    /// The durable self-locator URL, if persisted.
    pub fn self_locator(&self) -> Option<&str> {
        match self {
            Identity::New => None,
            Identity::Persisted { self_locator, .. } => Some(self_locator),
        }
    }
}

/// Entity kind; doubles as the REST resource collection name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A graph node.
    Node,
    /// A typed relationship between two nodes.
    Relationship,
}

impl EntityKind {
    /// REST resource collection path segment.
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Node => "node",
            EntityKind::Relationship => "relationship",
        }
    }
}

/// A node or relationship addressable by a batch transaction.
#[derive(Debug, Clone)]
pub enum Entity {
    /// A graph node.
    Node(Node),
    /// A typed relationship.
    Relationship(Relationship),
}

impl Entity {
    /// The entity kind.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Node(_) => EntityKind::Node,
            Entity::Relationship(_) => EntityKind::Relationship,
        }
    }

    /// Whether the entity has no durable identifier yet.
    pub fn is_new(&self) -> bool {
        match self {
            Entity::Node(node) => node.is_new(),
            Entity::Relationship(rel) => rel.is_new(),
        }
    }

    /// Server-assigned identifier, if persisted.
    pub fn durable_id(&self) -> Option<u64> {
        match self {
            Entity::Node(node) => node.durable_id(),
            Entity::Relationship(rel) => rel.durable_id(),
        }
    }

    /// Durable self-locator URL, if persisted.
    pub fn self_locator(&self) -> Option<String> {
        match self {
            Entity::Node(node) => node.self_locator(),
            Entity::Relationship(rel) => rel.self_locator(),
        }
    }

    /// Snapshot of the entity's attributes.
    pub fn attributes(&self) -> PropertyMap {
        match self {
            Entity::Node(node) => node.attributes(),
            Entity::Relationship(rel) => rel.attributes(),
        }
    }

    /// Whether index operations are emitted alongside saves and updates.
    pub fn auto_indexing(&self) -> bool {
        match self {
            Entity::Node(node) => node.auto_indexing(),
            Entity::Relationship(rel) => rel.auto_indexing(),
        }
    }

    /// Name of the index the entity is written to.
    pub fn index_name(&self) -> String {
        match self {
            Entity::Node(node) => node.index_name(),
            Entity::Relationship(rel) => rel.index_name(),
        }
    }

    /// The transaction-local correlation id, while enlisted.
    pub fn correlation_id(&self) -> Option<usize> {
        match self {
            Entity::Node(node) => node.correlation_id(),
            Entity::Relationship(rel) => rel.correlation_id(),
        }
    }

    pub(crate) fn assign_correlation_id(&self, id: Option<usize>) {
        match self {
            Entity::Node(node) => node.assign_correlation_id(id),
            Entity::Relationship(rel) => rel.assign_correlation_id(id),
        }
    }

    /// Run every registered validator, returning all violations found.
    pub fn validate(&self) -> Vec<ValidationError> {
        match self {
            Entity::Node(node) => node.validate(),
            Entity::Relationship(rel) => rel.validate(),
        }
    }
}

impl From<Node> for Entity {
    fn from(node: Node) -> Self {
        Entity::Node(node)
    }
}

impl From<&Node> for Entity {
    fn from(node: &Node) -> Self {
        Entity::Node(node.clone())
    }
}

impl From<Relationship> for Entity {
    fn from(rel: Relationship) -> Self {
        Entity::Relationship(rel)
    }
}

impl From<&Relationship> for Entity {
    fn from(rel: &Relationship) -> Self {
        Entity::Relationship(rel.clone())
    }
}

impl From<&Entity> for Entity {
    fn from(entity: &Entity) -> Self {
        entity.clone()
    }
}
