//! Batch-transaction client for the Neo4j REST API.
//!
//! This library assembles sequences of dependent create, update, and index
//! operations against a graph database's REST batch endpoint. Entities
//! created within one [`BatchTransaction`] reference each other through
//! batch-local `{N}` placeholders resolved by the server; entities that
//! already exist are referenced by their durable identities. The whole
//! ordered operation list is submitted as a single composite request through
//! an injected [`BatchTransport`].

pub mod batch;
pub mod config;
pub mod entity;
pub mod error;
pub mod service;
pub mod transport;
pub mod validation;

pub use batch::{BatchOperation, BatchTransaction, Method, OperationResult};
pub use config::GraphConfig;
pub use entity::{Entity, EntityKind, Identity, Node, PropertyMap, Relationship};
pub use error::{BatchError, BatchResult};
pub use service::GraphService;
pub use transport::{BatchTransport, TransportError};
pub use validation::{ValidationError, Validator};
