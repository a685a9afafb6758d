//! Record type: one stored business entity instance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::Value;

/// One stored business entity instance.
///
/// A record has an identifier (unique within its entity kind), a kind tag,
/// and a typed attribute bag. Attribute keys are unique; insertion order is
/// irrelevant. The query engine treats records as read-only; mutation is
/// the responsibility of whoever populates the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier, unique within the entity kind.
    pub id: Uuid,
    /// Entity kind this record belongs to.
    pub kind: String,
    attributes: HashMap<String, Value>,
}

impl Record {
    /// Create an empty record of the given kind.
    pub fn new(kind: impl Into<String>, id: Uuid) -> Self {
        Self {
            id,
            kind: kind.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute, builder style.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set an attribute, returning the previous value if the key existed.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Check whether an attribute is present (even if null).
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterate over all attributes.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes in the bag.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}
