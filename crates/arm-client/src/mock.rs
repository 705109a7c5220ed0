//! Mock ArmClient for unit testing
//!
//! This module provides a mock implementation of ArmClientTrait that can
//! be used in unit tests without requiring a reachable ARM endpoint.
//!
//! The mock stores payloads in memory keyed by (resource group, name),
//! records every mutating call for assertions, and can be switched into
//! failure modes to exercise error paths.

use crate::arm_trait::ArmClientTrait;
use crate::error::ArmError;
use crate::models::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Key = (String, String);

/// Mock ArmClient for testing
#[derive(Clone, Default)]
pub struct MockArmClient {
    subscription_id: String,
    // In-memory stores keyed by (resource group, name)
    virtual_networks: Arc<Mutex<HashMap<Key, VirtualNetwork>>>,
    public_ip_addresses: Arc<Mutex<HashMap<Key, PublicIpAddress>>>,
    route_tables: Arc<Mutex<HashMap<Key, RouteTable>>>,
    // Recorded mutating calls, in order
    virtual_network_upserts: Arc<Mutex<Vec<VirtualNetwork>>>,
    public_ip_address_upserts: Arc<Mutex<Vec<PublicIpAddress>>>,
    route_table_upserts: Arc<Mutex<Vec<RouteTable>>>,
    deletes: Arc<Mutex<Vec<(String, String, String)>>>,
    // Failure injection
    fail_gets: Arc<AtomicBool>,
    fail_mutations: Arc<AtomicBool>,
}

impl std::fmt::Debug for MockArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockArmClient")
            .field("subscription_id", &self.subscription_id)
            .finish_non_exhaustive()
    }
}

impl MockArmClient {
    /// Create a new mock client
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            ..Self::default()
        }
    }

    /// Seed a virtual network into the store (for test setup)
    pub fn add_virtual_network(&self, resource_group: &str, name: &str, network: VirtualNetwork) {
        self.virtual_networks
            .lock()
            .unwrap()
            .insert(key(resource_group, name), network);
    }

    /// Seed a public IP address into the store (for test setup)
    pub fn add_public_ip_address(&self, resource_group: &str, name: &str, address: PublicIpAddress) {
        self.public_ip_addresses
            .lock()
            .unwrap()
            .insert(key(resource_group, name), address);
    }

    /// Seed a route table into the store (for test setup)
    pub fn add_route_table(&self, resource_group: &str, name: &str, table: RouteTable) {
        self.route_tables
            .lock()
            .unwrap()
            .insert(key(resource_group, name), table);
    }

    /// When set, all get operations fail with a 500-class error
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// When set, all create-or-update and delete operations fail with a
    /// 500-class error
    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Payloads of recorded virtual network upserts, in call order
    pub fn virtual_network_upserts(&self) -> Vec<VirtualNetwork> {
        self.virtual_network_upserts.lock().unwrap().clone()
    }

    /// Payloads of recorded public IP address upserts, in call order
    pub fn public_ip_address_upserts(&self) -> Vec<PublicIpAddress> {
        self.public_ip_address_upserts.lock().unwrap().clone()
    }

    /// Payloads of recorded route table upserts, in call order
    pub fn route_table_upserts(&self) -> Vec<RouteTable> {
        self.route_table_upserts.lock().unwrap().clone()
    }

    /// Recorded delete calls as (resource type, resource group, name)
    pub fn deletes(&self) -> Vec<(String, String, String)> {
        self.deletes.lock().unwrap().clone()
    }

    /// Stored virtual network, if present
    pub fn virtual_network(&self, resource_group: &str, name: &str) -> Option<VirtualNetwork> {
        self.virtual_networks
            .lock()
            .unwrap()
            .get(&key(resource_group, name))
            .cloned()
    }

    fn service_error() -> ArmError {
        ArmError::Api {
            status: 500,
            message: "injected failure".to_string(),
        }
    }

    fn resource_id(&self, resource_group: &str, resource_type: &str, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/{}/{}",
            self.subscription_id, resource_group, resource_type, name
        )
    }
}

fn key(resource_group: &str, name: &str) -> Key {
    (resource_group.to_string(), name.to_string())
}

#[async_trait::async_trait]
impl ArmClientTrait for MockArmClient {
    fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    async fn validate_credentials(&self) -> Result<(), ArmError> {
        Ok(())
    }

    async fn get_virtual_network(&self, resource_group: &str, name: &str) -> Result<VirtualNetwork, ArmError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.virtual_networks
            .lock()
            .unwrap()
            .get(&key(resource_group, name))
            .cloned()
            .ok_or_else(|| ArmError::NotFound(format!("{resource_group}/{name}")))
    }

    async fn create_or_update_virtual_network(&self, resource_group: &str, name: &str, network: &VirtualNetwork) -> Result<AsyncHandle, ArmError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.virtual_network_upserts.lock().unwrap().push(network.clone());

        // Store the payload as the provider would echo it back
        let mut stored = network.clone();
        stored.id = Some(self.resource_id(resource_group, "virtualNetworks", name));
        stored.name = Some(name.to_string());
        stored.resource_type = Some("Microsoft.Network/virtualNetworks".to_string());
        if let Some(properties) = stored.properties.as_mut() {
            properties.provisioning_state = Some("Succeeded".to_string());
        }
        self.virtual_networks
            .lock()
            .unwrap()
            .insert(key(resource_group, name), stored);
        Ok(AsyncHandle::default())
    }

    async fn delete_virtual_network(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.deletes.lock().unwrap().push((
            "virtualNetworks".to_string(),
            resource_group.to_string(),
            name.to_string(),
        ));
        self.virtual_networks
            .lock()
            .unwrap()
            .remove(&key(resource_group, name))
            .map(|_| AsyncHandle::default())
            .ok_or_else(|| ArmError::NotFound(format!("{resource_group}/{name}")))
    }

    async fn get_public_ip_address(&self, resource_group: &str, name: &str) -> Result<PublicIpAddress, ArmError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.public_ip_addresses
            .lock()
            .unwrap()
            .get(&key(resource_group, name))
            .cloned()
            .ok_or_else(|| ArmError::NotFound(format!("{resource_group}/{name}")))
    }

    async fn create_or_update_public_ip_address(&self, resource_group: &str, name: &str, address: &PublicIpAddress) -> Result<AsyncHandle, ArmError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.public_ip_address_upserts.lock().unwrap().push(address.clone());

        let mut stored = address.clone();
        stored.id = Some(self.resource_id(resource_group, "publicIPAddresses", name));
        stored.name = Some(name.to_string());
        stored.resource_type = Some("Microsoft.Network/publicIPAddresses".to_string());
        if let Some(properties) = stored.properties.as_mut() {
            properties.provisioning_state = Some("Succeeded".to_string());
        }
        self.public_ip_addresses
            .lock()
            .unwrap()
            .insert(key(resource_group, name), stored);
        Ok(AsyncHandle::default())
    }

    async fn delete_public_ip_address(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.deletes.lock().unwrap().push((
            "publicIPAddresses".to_string(),
            resource_group.to_string(),
            name.to_string(),
        ));
        self.public_ip_addresses
            .lock()
            .unwrap()
            .remove(&key(resource_group, name))
            .map(|_| AsyncHandle::default())
            .ok_or_else(|| ArmError::NotFound(format!("{resource_group}/{name}")))
    }

    async fn get_route_table(&self, resource_group: &str, name: &str) -> Result<RouteTable, ArmError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.route_tables
            .lock()
            .unwrap()
            .get(&key(resource_group, name))
            .cloned()
            .ok_or_else(|| ArmError::NotFound(format!("{resource_group}/{name}")))
    }

    async fn create_or_update_route_table(&self, resource_group: &str, name: &str, table: &RouteTable) -> Result<AsyncHandle, ArmError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.route_table_upserts.lock().unwrap().push(table.clone());

        let mut stored = table.clone();
        stored.id = Some(self.resource_id(resource_group, "routeTables", name));
        stored.name = Some(name.to_string());
        stored.resource_type = Some("Microsoft.Network/routeTables".to_string());
        if let Some(properties) = stored.properties.as_mut() {
            properties.provisioning_state = Some("Succeeded".to_string());
        }
        self.route_tables
            .lock()
            .unwrap()
            .insert(key(resource_group, name), stored);
        Ok(AsyncHandle::default())
    }

    async fn delete_route_table(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::service_error());
        }
        self.deletes.lock().unwrap().push((
            "routeTables".to_string(),
            resource_group.to_string(),
            name.to_string(),
        ));
        self.route_tables
            .lock()
            .unwrap()
            .remove(&key(resource_group, name))
            .map(|_| AsyncHandle::default())
            .ok_or_else(|| ArmError::NotFound(format!("{resource_group}/{name}")))
    }
}
