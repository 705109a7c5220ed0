//! VirtualNetwork adapter
//!
//! Maps the VirtualNetwork CRD onto the ARM virtual network payload and
//! binds the kind to the ARM client.

use super::apply_common_observed;
use crate::connect::ArmConnecter;
use crate::reconciler::{Connecter, ExternalApi, ManagedResource, ReconcileError, ResourceKind};
use arm_client::{ArmClientTrait, ArmError, AsyncHandle};
use crds::{ResourceStatus, VirtualNetwork, VirtualNetworkObserved};
use std::sync::Arc;

impl ManagedResource for VirtualNetwork {
    type Observed = VirtualNetworkObserved;
    type Payload = arm_client::VirtualNetwork;

    const KIND: ResourceKind = ResourceKind::VirtualNetwork;

    fn external_name(&self) -> Result<&str, ReconcileError> {
        self.metadata
            .name
            .as_deref()
            .ok_or_else(|| ReconcileError::Config("VirtualNetwork has no name".to_string()))
    }

    fn resource_group(&self) -> Result<&str, ReconcileError> {
        self.spec.resource_group_name.as_deref().ok_or_else(|| {
            ReconcileError::Config(
                "VirtualNetwork resource group reference is not resolved".to_string(),
            )
        })
    }

    fn deletion_requested(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    fn status(&self) -> Option<&ResourceStatus<Self::Observed>> {
        self.status.as_ref()
    }

    fn status_mut(&mut self) -> &mut ResourceStatus<Self::Observed> {
        self.status.get_or_insert_with(ResourceStatus::default)
    }

    fn to_payload(&self) -> Self::Payload {
        arm_client::VirtualNetwork {
            location: Some(self.spec.location.clone()),
            tags: self.spec.tags.clone(),
            properties: Some(arm_client::VirtualNetworkPropertiesFormat {
                address_space: Some(arm_client::AddressSpace {
                    address_prefixes: self.spec.address_space.clone(),
                }),
                enable_ddos_protection: self.spec.enable_ddos_protection,
                enable_vm_protection: self.spec.enable_vm_protection,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn apply_observed(status: &mut ResourceStatus<Self::Observed>, payload: &Self::Payload) {
        apply_common_observed(status, payload);
        if let Some(guid) = payload
            .properties
            .as_ref()
            .and_then(|p| p.resource_guid.as_deref())
        {
            status.observed.resource_guid = Some(guid.to_string());
        }
    }

    fn needs_update(&self, observed: &Self::Payload) -> bool {
        let desired = self.to_payload();
        let desired_properties = desired.properties.unwrap_or_default();
        let observed_properties = observed.properties.clone().unwrap_or_default();

        desired_properties.address_space != observed_properties.address_space
            || desired_properties.enable_ddos_protection != observed_properties.enable_ddos_protection
            || desired_properties.enable_vm_protection != observed_properties.enable_vm_protection
            || desired.tags != observed.tags
    }
}

/// ARM client binding for virtual networks.
#[derive(Clone)]
pub struct VirtualNetworkApi {
    client: Arc<dyn ArmClientTrait>,
}

impl std::fmt::Debug for VirtualNetworkApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VirtualNetworkApi")
    }
}

impl VirtualNetworkApi {
    /// Bind the virtual network operations of an ARM client.
    #[must_use]
    pub fn new(client: Arc<dyn ArmClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ExternalApi<arm_client::VirtualNetwork> for VirtualNetworkApi {
    async fn get(&self, resource_group: &str, name: &str) -> Result<arm_client::VirtualNetwork, ArmError> {
        self.client.get_virtual_network(resource_group, name).await
    }

    async fn create_or_update(&self, resource_group: &str, name: &str, payload: &arm_client::VirtualNetwork) -> Result<AsyncHandle, ArmError> {
        self.client
            .create_or_update_virtual_network(resource_group, name, payload)
            .await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        self.client.delete_virtual_network(resource_group, name).await
    }
}

#[async_trait::async_trait]
impl Connecter<VirtualNetwork> for ArmConnecter {
    type Api = VirtualNetworkApi;

    async fn connect(&self, _record: &VirtualNetwork) -> Result<Self::Api, ReconcileError> {
        let client = self.client().map_err(|source| ReconcileError::Connect {
            kind: ResourceKind::VirtualNetwork,
            source,
        })?;
        Ok(VirtualNetworkApi::new(client))
    }
}
