//! Wire types for batch operations and their results.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method of a batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Create a resource or an index entry.
    Post,
    /// Replace a resource's properties.
    Put,
    /// Remove an index entry.
    Delete,
}

/// One unit of work inside a composite batch request.
///
/// Order in the operation list is significant: a `{N}` placeholder in `to` or
/// in the body only resolves against an operation whose `id` appears earlier
/// in the same submitted batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOperation {
    /// HTTP method.
    pub method: Method,
    /// Target path: an absolute durable path, a batch-local placeholder
    /// (`{3}`), or a composite of both (`{3}/relationships`).
    pub to: String,
    /// Request body, if the operation carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Correlation id; present on operations that other operations may
    /// reference by placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
}

/// Per-operation result returned by the batch endpoint, passed through to the
/// caller unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Correlation id of the operation this result belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    /// Path the operation was submitted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Location of a created resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Characters escaped when an attribute key or value becomes a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Batch-local placeholder token for a correlation id, e.g. `{3}`.
pub(crate) fn placeholder(correlation_id: usize) -> String {
    format!("{{{correlation_id}}}")
}

/// Percent-encode an index key or value for use as a path segment.
pub(crate) fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// Render a scalar attribute value as index text.
///
/// Returns `None` for values excluded from indexing: arrays, objects, and
/// null.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_methods_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&Method::Post).unwrap(), "\"POST\"");
        assert_eq!(serde_json::to_string(&Method::Put).unwrap(), "\"PUT\"");
        assert_eq!(serde_json::to_string(&Method::Delete).unwrap(), "\"DELETE\"");
    }

    #[test]
    fn test_absent_body_and_id_are_omitted_from_the_wire() {
        let op = BatchOperation {
            method: Method::Delete,
            to: "/index/node/node/7".to_string(),
            body: None,
            id: None,
        };
        let wire = serde_json::to_value(&op).unwrap();
        assert_eq!(wire, json!({"method": "DELETE", "to": "/index/node/node/7"}));
    }

    #[test]
    fn test_full_operation_round_trips() {
        let op = BatchOperation {
            method: Method::Post,
            to: "{0}/relationships".to_string(),
            body: Some(json!({"to": "{1}", "type": "KNOWS", "data": {}})),
            id: Some(2),
        };
        let wire = serde_json::to_string(&op).unwrap();
        let parsed: BatchOperation = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed, op);
    }

    #[test]
    fn test_operation_result_parses_a_server_record() {
        let raw = json!({
            "id": 0,
            "from": "/node",
            "location": "http://localhost:7474/db/data/node/5",
            "body": {"self": "http://localhost:7474/db/data/node/5"}
        });
        let result: OperationResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.id, Some(0));
        assert_eq!(
            result.location.as_deref(),
            Some("http://localhost:7474/db/data/node/5")
        );
    }

    #[test]
    fn test_placeholder_format() {
        assert_eq!(placeholder(0), "{0}");
        assert_eq!(placeholder(12), "{12}");
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        assert_eq!(encode_segment("name"), "name");
        assert_eq!(encode_segment("full name"), "full%20name");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
        assert_eq!(encode_segment("50%"), "50%25");
    }

    #[test]
    fn test_scalars_are_indexable_nested_values_are_not() {
        assert_eq!(scalar_text(&json!("a")), Some("a".to_string()));
        assert_eq!(scalar_text(&json!(42)), Some("42".to_string()));
        assert_eq!(scalar_text(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!([1, 2])), None);
        assert_eq!(scalar_text(&json!({"k": "v"})), None);
    }
}
