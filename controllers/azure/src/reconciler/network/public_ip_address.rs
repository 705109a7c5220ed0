//! PublicIPAddress adapter
//!
//! Maps the PublicIPAddress CRD onto the ARM public IP payload and binds
//! the kind to the ARM client.

use super::apply_common_observed;
use crate::connect::ArmConnecter;
use crate::reconciler::{Connecter, ExternalApi, ManagedResource, ReconcileError, ResourceKind};
use arm_client::{ArmClientTrait, ArmError, AsyncHandle};
use crds::{
    IPAllocationMethod, IPVersion, PublicIPAddress, PublicIPAddressObserved,
    PublicIPAddressSkuName, ResourceStatus,
};
use std::sync::Arc;

fn sku_name(sku: PublicIPAddressSkuName) -> &'static str {
    match sku {
        PublicIPAddressSkuName::Basic => "Basic",
        PublicIPAddressSkuName::Standard => "Standard",
    }
}

fn allocation_method_name(method: IPAllocationMethod) -> &'static str {
    match method {
        IPAllocationMethod::Static => "Static",
        IPAllocationMethod::Dynamic => "Dynamic",
    }
}

fn version_name(version: IPVersion) -> &'static str {
    match version {
        IPVersion::IPv4 => "IPv4",
        IPVersion::IPv6 => "IPv6",
    }
}

/// Mutable view of DNS settings: the label and reverse FQDN the user
/// controls, without the provider-assigned `fqdn`.
fn dns_fields(
    settings: Option<&arm_client::PublicIpAddressDnsSettings>,
) -> Option<(Option<&str>, Option<&str>)> {
    settings.map(|dns| (dns.domain_name_label.as_deref(), dns.reverse_fqdn.as_deref()))
}

impl ManagedResource for PublicIPAddress {
    type Observed = PublicIPAddressObserved;
    type Payload = arm_client::PublicIpAddress;

    const KIND: ResourceKind = ResourceKind::PublicIPAddress;

    fn external_name(&self) -> Result<&str, ReconcileError> {
        self.metadata
            .name
            .as_deref()
            .ok_or_else(|| ReconcileError::Config("PublicIPAddress has no name".to_string()))
    }

    fn resource_group(&self) -> Result<&str, ReconcileError> {
        self.spec.resource_group_name.as_deref().ok_or_else(|| {
            ReconcileError::Config(
                "PublicIPAddress resource group reference is not resolved".to_string(),
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
        // The single defaulting point for the SKU: an unset field maps to
        // the provider baseline here and nowhere else.
        let sku = self.spec.sku.unwrap_or(PublicIPAddressSkuName::Basic);

        arm_client::PublicIpAddress {
            location: Some(self.spec.location.clone()),
            tags: self.spec.tags.clone(),
            sku: Some(arm_client::PublicIpAddressSku {
                name: Some(sku_name(sku).to_string()),
            }),
            properties: Some(arm_client::PublicIpAddressPropertiesFormat {
                public_ip_allocation_method: Some(
                    allocation_method_name(self.spec.allocation_method).to_string(),
                ),
                public_ip_address_version: self.spec.version.map(|v| version_name(v).to_string()),
                idle_timeout_in_minutes: self.spec.idle_timeout_in_minutes,
                dns_settings: self.spec.dns_settings.as_ref().map(|dns| {
                    arm_client::PublicIpAddressDnsSettings {
                        domain_name_label: Some(dns.domain_name_label.clone()),
                        reverse_fqdn: dns.reverse_fqdn.clone(),
                        ..Default::default()
                    }
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn apply_observed(status: &mut ResourceStatus<Self::Observed>, payload: &Self::Payload) {
        apply_common_observed(status, payload);
        if let Some(properties) = payload.properties.as_ref() {
            if let Some(guid) = properties.resource_guid.as_deref() {
                status.observed.resource_guid = Some(guid.to_string());
            }
            if let Some(address) = properties.ip_address.as_deref() {
                status.observed.ip_address = Some(address.to_string());
            }
            if let Some(fqdn) = properties
                .dns_settings
                .as_ref()
                .and_then(|dns| dns.fqdn.as_deref())
            {
                status.observed.fqdn = Some(fqdn.to_string());
            }
        }
    }

    fn needs_update(&self, observed: &Self::Payload) -> bool {
        let desired = self.to_payload();
        let desired_properties = desired.properties.unwrap_or_default();
        let observed_properties = observed.properties.clone().unwrap_or_default();

        desired_properties.public_ip_allocation_method
            != observed_properties.public_ip_allocation_method
            || desired_properties.idle_timeout_in_minutes
                != observed_properties.idle_timeout_in_minutes
            || dns_fields(desired_properties.dns_settings.as_ref())
                != dns_fields(observed_properties.dns_settings.as_ref())
            || desired.tags != observed.tags
    }
}

/// ARM client binding for public IP addresses.
#[derive(Clone)]
pub struct PublicIpAddressApi {
    client: Arc<dyn ArmClientTrait>,
}

impl std::fmt::Debug for PublicIpAddressApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PublicIpAddressApi")
    }
}

impl PublicIpAddressApi {
    /// Bind the public IP address operations of an ARM client.
    #[must_use]
    pub fn new(client: Arc<dyn ArmClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ExternalApi<arm_client::PublicIpAddress> for PublicIpAddressApi {
    async fn get(&self, resource_group: &str, name: &str) -> Result<arm_client::PublicIpAddress, ArmError> {
        self.client.get_public_ip_address(resource_group, name).await
    }

    async fn create_or_update(&self, resource_group: &str, name: &str, payload: &arm_client::PublicIpAddress) -> Result<AsyncHandle, ArmError> {
        self.client
            .create_or_update_public_ip_address(resource_group, name, payload)
            .await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        self.client.delete_public_ip_address(resource_group, name).await
    }
}

#[async_trait::async_trait]
impl Connecter<PublicIPAddress> for ArmConnecter {
    type Api = PublicIpAddressApi;

    async fn connect(&self, _record: &PublicIPAddress) -> Result<Self::Api, ReconcileError> {
        let client = self.client().map_err(|source| ReconcileError::Connect {
            kind: ResourceKind::PublicIPAddress,
            source,
        })?;
        Ok(PublicIpAddressApi::new(client))
    }
}
