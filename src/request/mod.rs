//! Request mapper.
//!
//! Turns command trees into ordered wire requests against the OpenConfig
//! spanning-tree resource. Updates are bundled per section; deletes are
//! issued per addressable attribute because the device rejects multi-leaf
//! deletes.

mod delete;
mod modify;
mod paths;
mod payload;

pub use delete::{
    DeleteRequestBuilder, interface_delete, mst_instance_delete, mstp_containers_delete,
    vlan_entity_deletes,
};
pub use modify::ModifyRequestBuilder;
pub use paths::{PerVlanFamily, STP_PATH};

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::{ReconcileError, Result};

/// HTTP method of a wire request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Merge the payload into the addressed resource.
    Patch,
    /// Remove the addressed resource.
    Delete,
}

/// One request against the device API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireRequest {
    /// Resource path rooted at [`STP_PATH`].
    pub path: String,
    /// Request method.
    pub method: Method,
    /// Request body, present for updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl WireRequest {
    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Delete,
            data: None,
        }
    }

    /// Creates a PATCH request carrying a typed payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded.
    pub fn patch<T: Serialize>(path: impl Into<String>, payload: &T) -> Result<Self> {
        let data = serde_json::to_value(payload)
            .map_err(|e| ReconcileError::serialization(format!("Failed to encode payload: {e}")))?;
        Ok(Self {
            path: path.into(),
            method: Method::Patch,
            data: Some(data),
        })
    }

    /// Creates a PATCH request setting a single boolean leaf.
    #[must_use]
    pub fn patch_leaf(path: impl Into<String>, leaf: &str, value: bool) -> Self {
        let mut body = serde_json::Map::new();
        body.insert(leaf.to_string(), Value::Bool(value));
        Self {
            path: path.into(),
            method: Method::Patch,
            data: Some(Value::Object(body)),
        }
    }

    /// Returns true for DELETE requests.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.method == Method::Delete
    }

    /// Returns true for the whole-resource delete.
    #[must_use]
    pub fn is_delete_all(&self) -> bool {
        self.is_delete() && self.path == STP_PATH
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for WireRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = WireRequest::delete(STP_PATH);
        assert!(request.is_delete_all());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"path": "data/openconfig-spanning-tree:stp", "method": "DELETE"})
        );
    }

    #[test]
    fn test_patch_leaf() {
        let request = WireRequest::patch_leaf("x/bpdu-guard", "openconfig-spanning-tree:bpdu-guard", false);
        assert!(!request.is_delete());
        assert_eq!(
            request.data,
            Some(json!({"openconfig-spanning-tree:bpdu-guard": false}))
        );
        assert_eq!(request.to_string(), "PATCH x/bpdu-guard");
    }
}
