//! VirtualNetwork CRD
//!
//! Declarative specification of an Azure virtual network.

use crate::references::{ResourceReference, ResourceSelector};
use crate::status::ResourceStatus;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "azure.cloudops.io",
    version = "v1alpha1",
    kind = "VirtualNetwork",
    namespaced,
    status = "VirtualNetworkStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkSpec {
    /// Name of the resource group this network lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_name: Option<String>,

    /// Reference to a ResourceGroup object whose resolved name fills
    /// `resourceGroupName`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_name_ref: Option<ResourceReference>,

    /// Selector for a ResourceGroup object when no explicit reference is
    /// given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_name_selector: Option<ResourceSelector>,

    /// Azure region of the network (e.g. "eastus")
    pub location: String,

    /// Address ranges of the network, in CIDR notation
    pub address_space: Vec<String>,

    /// Enable DDoS protection for the network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ddos_protection: Option<bool>,

    /// Enable VM protection for the network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_vm_protection: Option<bool>,

    /// Resource tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

/// Status of a VirtualNetwork.
pub type VirtualNetworkStatus = ResourceStatus<VirtualNetworkObserved>;

/// Read-only fields the provider assigns to a virtual network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkObserved {
    /// Provider-assigned GUID of the network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_guid: Option<String>,
}
