//! Relationship endpoint resolution.
//!
//! Decides whether a relationship being saved references its endpoints by
//! batch-local placeholder or by durable identity.

use serde_json::Value;

use crate::entity::Relationship;
use crate::error::{BatchError, BatchResult};

use super::operation::placeholder;

/// Resolved creation target for a relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoints {
    /// The `to` field of the creation body: a placeholder token or a durable
    /// self-locator string.
    pub to: Value,
    /// The creation path: `{start}/relationships` or
    /// `/node/<id>/relationships`.
    pub path: String,
}

/// Resolve the endpoints of a relationship about to be saved.
///
/// When both endpoints carry a correlation id (were enlisted earlier in the
/// same transaction), the relationship is fully transactional and both
/// references are placeholders. Otherwise the start node must already be
/// persisted and the end node must have a durable self-locator; anything less
/// is a caller-ordering bug surfaced as a precondition failure before any
/// transaction state changes.
pub fn resolve(rel: &Relationship) -> BatchResult<ResolvedEndpoints> {
    let start = rel.start();
    let end = rel.end();

    if let (Some(start_id), Some(end_id)) = (start.correlation_id(), end.correlation_id()) {
        return Ok(ResolvedEndpoints {
            to: Value::String(placeholder(end_id)),
            path: format!("{}/relationships", placeholder(start_id)),
        });
    }

    let start_durable = start.durable_id().ok_or_else(|| {
        BatchError::precondition(
            "relationship start node has neither a correlation id nor a durable id",
        )
    })?;
    let end_locator = end.self_locator().ok_or_else(|| {
        BatchError::precondition("relationship end node has no durable self locator")
    })?;

    Ok(ResolvedEndpoints {
        to: Value::String(end_locator),
        path: format!("/node/{start_durable}/relationships"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Node, PropertyMap};

    fn locator(id: u64) -> String {
        format!("http://localhost:7474/db/data/node/{id}")
    }

    #[test]
    fn test_both_enlisted_endpoints_resolve_to_placeholders() {
        let start = Node::new(PropertyMap::new());
        let end = Node::new(PropertyMap::new());
        start.assign_correlation_id(Some(0));
        end.assign_correlation_id(Some(1));

        let rel = Relationship::new(start, end, "KNOWS", PropertyMap::new());
        let resolved = resolve(&rel).unwrap();
        assert_eq!(resolved.path, "{0}/relationships");
        assert_eq!(resolved.to, Value::String("{1}".to_string()));
    }

    #[test]
    fn test_persisted_endpoints_resolve_to_durable_identities() {
        let start = Node::persisted(42, locator(42), PropertyMap::new());
        let end = Node::persisted(43, locator(43), PropertyMap::new());

        let rel = Relationship::new(start, end, "KNOWS", PropertyMap::new());
        let resolved = resolve(&rel).unwrap();
        assert_eq!(resolved.path, "/node/42/relationships");
        assert_eq!(resolved.to, Value::String(locator(43)));
    }

    #[test]
    fn test_one_enlisted_endpoint_falls_back_to_durable_identities() {
        // Only the end node was enlisted; the fallback needs the start node's
        // durable id, which it has.
        let start = Node::persisted(42, locator(42), PropertyMap::new());
        let end = Node::persisted(43, locator(43), PropertyMap::new());
        end.assign_correlation_id(Some(5));

        let rel = Relationship::new(start, end, "KNOWS", PropertyMap::new());
        let resolved = resolve(&rel).unwrap();
        assert_eq!(resolved.path, "/node/42/relationships");
        assert_eq!(resolved.to, Value::String(locator(43)));
    }

    #[test]
    fn test_start_without_any_identity_is_a_precondition_failure() {
        let start = Node::new(PropertyMap::new());
        let end = Node::persisted(43, locator(43), PropertyMap::new());

        let rel = Relationship::new(start, end, "KNOWS", PropertyMap::new());
        let err = resolve(&rel).unwrap_err();
        assert!(matches!(err, BatchError::Precondition(_)));
    }

    #[test]
    fn test_end_without_a_locator_is_a_precondition_failure() {
        let start = Node::persisted(42, locator(42), PropertyMap::new());
        let end = Node::new(PropertyMap::new());

        let rel = Relationship::new(start, end, "KNOWS", PropertyMap::new());
        let err = resolve(&rel).unwrap_err();
        assert!(matches!(err, BatchError::Precondition(_)));
    }
}
