use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The parsed representation of one input definition file.
///
/// A document is a semi-structured object tree: nodes may nest further
/// collections under `resources`, `methods`, `responses` and `body`, and any
/// node may carry a `properties` collection either directly or under an
/// `items` wrapper. A closed struct cannot express that shape, so `Document`
/// wraps a [`serde_json::Value`] and dereferences to it for read access.
///
/// Once returned from [`parse`](crate::parse), every node's `properties`
/// collection (if present) is sorted ascending by `displayName`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Deref,
    derive_more::DerefMut,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Document(pub(crate) Value);

impl Document {
    /// The document's `displayName`, when present.
    pub fn display_name(&self) -> Option<&str> {
        node_display_name(&self.0)
    }

    /// The document's top-level `resources` collection, empty when absent.
    pub fn resources(&self) -> &[Value] {
        self.0
            .get("resources")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Consumes the document, returning the underlying value tree.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// A copy of this document whose `resources` collection is replaced by a
    /// one-element list containing just `resource`.
    ///
    /// Used by the per-resource splitting strategies to build a rendering
    /// context limited to a single resource.
    pub(crate) fn with_single_resource(&self, resource: &Value) -> Self {
        let mut value = self.0.clone();
        if let Some(object) = value.as_object_mut() {
            object.insert("resources".to_string(), Value::Array(vec![resource.clone()]));
        }
        Self(value)
    }
}

/// The `displayName` of an arbitrary node, when present.
pub(crate) fn node_display_name(node: &Value) -> Option<&str> {
    node.get("displayName").and_then(Value::as_str)
}

/// The `uniqueId` of an arbitrary node, when present.
pub(crate) fn node_unique_id(node: &Value) -> Option<&str> {
    node.get("uniqueId").and_then(Value::as_str)
}
