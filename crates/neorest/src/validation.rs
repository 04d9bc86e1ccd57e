//! Validation seam for models enlisted in a batch.
//!
//! Rule definitions live outside the batch core; entities aggregate the
//! validators registered on them and report every violation found.

use std::fmt;

use crate::entity::PropertyMap;

/// A single validation failure on a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Attribute the failure refers to, if it concerns one in particular.
    pub attribute: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl ValidationError {
    /// A failure tied to a specific attribute.
    pub fn attribute(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: Some(attribute.into()),
            message: message.into(),
        }
    }

    /// A failure concerning the model as a whole.
    pub fn model(message: impl Into<String>) -> Self {
        Self {
            attribute: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attribute) => write!(f, "{}: {}", attribute, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A validation rule applied to an entity's attributes before it is enlisted.
pub trait Validator: Send + Sync {
    /// Check the given attributes, returning all violations found.
    fn validate(&self, attributes: &PropertyMap) -> Vec<ValidationError>;
}
