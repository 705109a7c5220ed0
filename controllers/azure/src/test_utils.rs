//! Test utilities for unit testing reconcilers
//!
//! This module provides helpers for creating test records and marking
//! them for deletion.

use chrono::Utc;
use crds::{
    IPAllocationMethod, PublicIPAddress, PublicIPAddressSpec, RouteSpec, RouteTable,
    RouteTableSpec, VirtualNetwork, VirtualNetworkSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use std::collections::BTreeMap;

/// Helper to create a test VirtualNetwork record
pub fn test_virtual_network(name: &str, location: &str) -> VirtualNetwork {
    VirtualNetwork {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: VirtualNetworkSpec {
            resource_group_name: Some("test-rg".to_string()),
            resource_group_name_ref: None,
            resource_group_name_selector: None,
            location: location.to_string(),
            address_space: vec!["10.0.0.0/16".to_string()],
            enable_ddos_protection: None,
            enable_vm_protection: None,
            tags: None,
        },
        status: None,
    }
}

/// Helper to create a test PublicIPAddress record
pub fn test_public_ip_address(name: &str, location: &str) -> PublicIPAddress {
    PublicIPAddress {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: PublicIPAddressSpec {
            resource_group_name: Some("test-rg".to_string()),
            resource_group_name_ref: None,
            resource_group_name_selector: None,
            location: location.to_string(),
            sku: None,
            allocation_method: IPAllocationMethod::Static,
            version: None,
            idle_timeout_in_minutes: None,
            dns_settings: None,
            tags: None,
        },
        status: None,
    }
}

/// Helper to create a test RouteTable record
pub fn test_route_table(name: &str, location: &str, routes: Vec<RouteSpec>) -> RouteTable {
    RouteTable {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: RouteTableSpec {
            resource_group_name: Some("test-rg".to_string()),
            resource_group_name_ref: None,
            resource_group_name_selector: None,
            location: location.to_string(),
            routes,
            disable_bgp_route_propagation: None,
            tags: None,
        },
        status: None,
    }
}

/// Tags helper for test specs
pub fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Mark a record as deleted by the user, as the API server would
pub fn mark_for_deletion(metadata: &mut ObjectMeta) {
    metadata.deletion_timestamp = Some(Time(Utc::now()));
}
