//! # Resource Identifier
//!
//! The `(type, id)` pair naming a resource. It is what relationship `data`
//! renders and the key the encoder deduplicates `included` on.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identity of a resource.
///
/// Equality is structural: two domain objects producing the same type and id
/// are the same resource as far as the document is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

impl Display for ResourceIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}
