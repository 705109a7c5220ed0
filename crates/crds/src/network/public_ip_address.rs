//! PublicIPAddress CRD
//!
//! Declarative specification of an Azure public IP address.

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
    kind = "PublicIPAddress",
    namespaced,
    status = "PublicIPAddressStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct PublicIPAddressSpec {
    /// Name of the resource group this address lives in
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

    /// Azure region of the address (e.g. "eastus")
    pub location: String,

    /// SKU of the address. When unset, the provider baseline SKU (Basic)
    /// is substituted at payload-mapping time; this is the single
    /// defaulting point for the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<PublicIPAddressSkuName>,

    /// How the address is allocated
    pub allocation_method: IPAllocationMethod,

    /// IP version of the address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<IPVersion>,

    /// Idle timeout for inbound connections, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_in_minutes: Option<i32>,

    /// DNS settings for the address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_settings: Option<PublicIPAddressDnsSettings>,

    /// Resource tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

/// SKU names for a public IP address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum PublicIPAddressSkuName {
    /// Baseline SKU
    Basic,
    /// Zone-redundant SKU
    Standard,
}

/// Allocation method of a public IP address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum IPAllocationMethod {
    /// The address is fixed for the lifetime of the resource.
    Static,
    /// The address may change when the resource is restarted.
    Dynamic,
}

/// IP version of a public IP address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum IPVersion {
    /// IPv4
    IPv4,
    /// IPv6
    IPv6,
}

/// DNS settings associated with a public IP address.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIPAddressDnsSettings {
    /// Label that forms the DNS name `<label>.<region>.cloudapp.azure.com`
    pub domain_name_label: String,

    /// Reverse FQDN pointing back to the address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_fqdn: Option<String>,
}

/// Status of a PublicIPAddress.
pub type PublicIPAddressStatus = ResourceStatus<PublicIPAddressObserved>;

/// Read-only fields the provider assigns to a public IP address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicIPAddressObserved {
    /// The allocated address, once assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Fully qualified domain name of the address, once assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,

    /// Provider-assigned GUID of the address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_guid: Option<String>,
}
