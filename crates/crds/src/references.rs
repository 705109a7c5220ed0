//! Cross-resource references for Azure-sync CRDs
//!
//! Specs name their parent resource group either literally or through a
//! deferred reference/selector pair. Resolution is performed by an upstream
//! collaborator before reconciliation begins: the resolver copies the
//! referenced object's name into the literal field, and the reconciler only
//! ever reads the literal.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to another cluster object, following the Kubernetes
/// `TypedLocalObjectReference` pattern.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    /// API group of the referenced resource (e.g. "azure.cloudops.io")
    pub api_group: String,

    /// Kind of the referenced resource (e.g. "ResourceGroup")
    pub kind: String,

    /// Name of the referenced resource
    pub name: String,

    /// Namespace of the referenced resource (defaults to the same
    /// namespace as the referencing resource)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ResourceReference {
    /// Create a reference within the Azure-sync API group.
    pub fn azure(kind: &str, name: String) -> Self {
        Self {
            api_group: "azure.cloudops.io".to_string(),
            kind: kind.to_string(),
            name,
            namespace: None,
        }
    }
}

/// Label selector used to pick a referenced object when no explicit
/// reference is given.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSelector {
    /// Labels the referenced object must carry.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
}
