//! RouteTable CRD
//!
//! Declarative specification of an Azure route table and its routes.

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
    kind = "RouteTable",
    namespaced,
    status = "RouteTableStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct RouteTableSpec {
    /// Name of the resource group this table lives in
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

    /// Azure region of the table (e.g. "eastus")
    pub location: String,

    /// Routes of this table, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteSpec>,

    /// Disable the routes learned by BGP on the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_bgp_route_propagation: Option<bool>,

    /// Resource tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

/// A single route within a route table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// Name of the route, unique within the table
    pub name: String,

    /// Destination CIDR the route applies to
    pub address_prefix: String,

    /// Where matching packets are forwarded
    pub next_hop_type: RouteNextHopType,

    /// IP address of the next hop; only meaningful when the next hop type
    /// is `VirtualAppliance`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hop_ip_address: Option<String>,
}

/// Next hop targets a route can forward to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum RouteNextHopType {
    /// Route to the virtual network gateway.
    VirtualNetworkGateway,
    /// Route within the local virtual network.
    VnetLocal,
    /// Route to the internet.
    Internet,
    /// Route to a virtual appliance at `nextHopIpAddress`.
    VirtualAppliance,
    /// Drop matching packets.
    None,
}

/// Status of a RouteTable.
pub type RouteTableStatus = ResourceStatus<RouteTableObserved>;

/// Read-only fields the provider assigns to a route table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteTableObserved {
    /// IDs of the subnets associated with this table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Vec<String>>,
}
