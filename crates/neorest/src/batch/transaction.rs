//! Batch transaction assembly and submission.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::entity::Entity;
use crate::error::{BatchError, BatchResult};
use crate::transport::BatchTransport;

use super::operation::{encode_segment, placeholder, scalar_text, BatchOperation, Method, OperationResult};
use super::resolver;

/// Assembles dependent create, update, and index operations and submits them
/// to the batch endpoint as one composite request.
///
/// A transaction is created per logical unit of work, mutated by repeated
/// add-operation calls, and consumed exactly once by
/// [`execute`](BatchTransaction::execute). Correlation ids assigned to
/// enlisted entities are only meaningful for this transaction's lifetime; they
/// are cleared the moment submission begins.
///
/// Builder calls take `&mut self`; a transaction is meant to be driven by one
/// logical workflow at a time.
#[derive(Debug)]
pub struct BatchTransaction<T> {
    transport: T,
    operations: Vec<BatchOperation>,
    instances: HashMap<usize, Entity>,
}

impl<T> BatchTransaction<T> {
    /// An empty transaction submitting through the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            operations: Vec::new(),
            instances: HashMap::new(),
        }
    }

    /// Operations queued so far, in submission order.
    pub fn operations(&self) -> &[BatchOperation] {
        &self.operations
    }

    /// Number of entities enlisted so far.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Queue a save for the entity, validating it first.
    ///
    /// Save is an upsert: a new entity gets a create operation; a persisted
    /// entity gets a property update followed by the type-specific
    /// creation-path operation, and is enlisted in this transaction's
    /// correlation space either way so later relationships can reference it.
    pub fn add_save<E>(&mut self, entity: E) -> BatchResult<()>
    where
        E: Into<Entity>,
    {
        self.add_save_with(entity, true)
    }

    /// Queue a save, optionally skipping validation.
    pub fn add_save_with<E>(&mut self, entity: E, validate: bool) -> BatchResult<()>
    where
        E: Into<Entity>,
    {
        let entity = entity.into();
        if validate {
            self.check(&entity)?;
        }

        match &entity {
            Entity::Node(_) => {
                let correlation = self.enlist(&entity);
                self.push_upsert_step(&entity, correlation);
                self.operations.push(BatchOperation {
                    method: Method::Post,
                    to: format!("/{}", entity.kind().resource()),
                    body: Some(Value::Object(entity.attributes())),
                    id: Some(correlation),
                });
                if entity.auto_indexing() {
                    self.push_index_ops(&entity, correlation);
                }
            }
            Entity::Relationship(rel) => {
                // Resolve before touching any transaction state so a
                // precondition failure leaves it unchanged.
                let endpoints = resolver::resolve(rel)?;
                let correlation = self.enlist(&entity);
                self.push_upsert_step(&entity, correlation);
                self.operations.push(BatchOperation {
                    method: Method::Post,
                    to: endpoints.path,
                    body: Some(json!({
                        "to": endpoints.to,
                        "type": rel.rel_type(),
                        "data": rel.attributes(),
                    })),
                    id: Some(correlation),
                });
                if entity.auto_indexing() {
                    self.push_index_ops(&entity, correlation);
                }
            }
        }

        Ok(())
    }

    /// Queue a property update for an already-persisted entity, validating it
    /// first.
    pub fn add_update<E>(&mut self, entity: E) -> BatchResult<()>
    where
        E: Into<Entity>,
    {
        self.add_update_with(entity, true)
    }

    /// Queue a property update, optionally skipping validation.
    ///
    /// Emits exactly one `PUT .../properties` operation carrying the full
    /// current attribute map (a replace, not a patch), plus index operations
    /// when auto-indexing is enabled.
    pub fn add_update_with<E>(&mut self, entity: E, validate: bool) -> BatchResult<()>
    where
        E: Into<Entity>,
    {
        let entity = entity.into();
        if validate {
            self.check(&entity)?;
        }
        let durable = entity.durable_id().ok_or_else(|| {
            BatchError::precondition("cannot update an entity that has never been persisted")
        })?;

        let correlation = self.enlist(&entity);
        self.push_update_op(&entity, durable, correlation);
        if entity.auto_indexing() {
            self.push_index_ops(&entity, correlation);
        }
        Ok(())
    }

    fn check(&self, entity: &Entity) -> BatchResult<()> {
        let errors = entity.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BatchError::validation(errors))
        }
    }

    /// Assign the next correlation id and register the entity under it.
    ///
    /// The id equals the current operation-list length, so it is dense,
    /// zero-based, and matches the position of the entity's first operation —
    /// which is what the server indexes placeholder resolution by.
    fn enlist(&mut self, entity: &Entity) -> usize {
        let correlation = self.operations.len();
        entity.assign_correlation_id(Some(correlation));
        self.instances.insert(correlation, entity.clone());
        correlation
    }

    /// The update sub-step of save for an already-persisted entity. Emits the
    /// property update (and its index operations) under the same correlation
    /// id the save assigned.
    fn push_upsert_step(&mut self, entity: &Entity, correlation: usize) {
        if let Some(durable) = entity.durable_id() {
            self.push_update_op(entity, durable, correlation);
            if entity.auto_indexing() {
                self.push_index_ops(entity, correlation);
            }
        }
    }

    fn push_update_op(&mut self, entity: &Entity, durable: u64, correlation: usize) {
        self.operations.push(BatchOperation {
            method: Method::Put,
            to: format!("/{}/{}/properties", entity.kind().resource(), durable),
            body: Some(Value::Object(entity.attributes())),
            id: Some(correlation),
        });
    }

    /// Emit index operations for the enlisted entity.
    ///
    /// A previously persisted entity gets a delete of its stale index entries
    /// first. Every scalar attribute present at build time is indexed under
    /// the entity's placeholder; for relationships the `type` field is indexed
    /// as well, since it is not a regular attribute.
    fn push_index_ops(&mut self, entity: &Entity, correlation: usize) {
        let kind = entity.kind().resource();
        let index = entity.index_name();

        if let Some(durable) = entity.durable_id() {
            self.operations.push(BatchOperation {
                method: Method::Delete,
                to: format!("/index/{kind}/{index}/{durable}"),
                body: None,
                id: None,
            });
        }

        let token = placeholder(correlation);
        for (key, value) in entity.attributes() {
            if let Some(text) = scalar_text(&value) {
                self.operations.push(BatchOperation {
                    method: Method::Post,
                    to: format!(
                        "/index/{kind}/{index}/{}/{}",
                        encode_segment(&key),
                        encode_segment(&text)
                    ),
                    body: Some(Value::String(token.clone())),
                    id: None,
                });
            }
        }

        if let Entity::Relationship(rel) = entity {
            self.operations.push(BatchOperation {
                method: Method::Post,
                to: format!(
                    "/index/{kind}/{index}/type/{}",
                    encode_segment(&rel.rel_type())
                ),
                body: Some(Value::String(token)),
                id: None,
            });
        }
    }
}

impl<T: BatchTransport> BatchTransaction<T> {
    /// Submit the queued operations as one composite request and return the
    /// per-operation results unmodified.
    ///
    /// An empty transaction resolves to an empty result set without
    /// contacting the transport; the server rejects empty batch requests and
    /// there is nothing to do.
    ///
    /// Enlisted entities are released from this transaction's bookkeeping —
    /// their correlation ids cleared — the moment submission begins,
    /// regardless of the network outcome. Transport failures are wrapped as
    /// [`BatchError::Execution`] and never retried here; a batch is not
    /// inherently idempotent, so retry policy belongs to the caller.
    pub async fn execute(mut self) -> BatchResult<Vec<OperationResult>> {
        if self.operations.is_empty() {
            tracing::debug!("batch transaction is empty, skipping submission");
            return Ok(Vec::new());
        }

        for entity in self.instances.values() {
            entity.assign_correlation_id(None);
        }
        self.instances.clear();

        let operations = std::mem::take(&mut self.operations);
        tracing::debug!(operations = operations.len(), "submitting batch");

        let results = self.transport.submit(&operations).await?;
        Ok(results)
    }
}

impl<T> Drop for BatchTransaction<T> {
    fn drop(&mut self) {
        // An abandoned transaction must not leave stale correlation ids on
        // entities a later transaction might reuse. Execute has already
        // drained the registry by the time self drops.
        for entity in self.instances.values() {
            entity.assign_correlation_id(None);
        }
    }
}
