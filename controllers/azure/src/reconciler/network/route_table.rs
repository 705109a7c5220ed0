//! RouteTable adapter
//!
//! Maps the RouteTable CRD onto the ARM route table payload and binds the
//! kind to the ARM client.

use super::apply_common_observed;
use crate::connect::ArmConnecter;
use crate::reconciler::{Connecter, ExternalApi, ManagedResource, ReconcileError, ResourceKind};
use arm_client::{ArmClientTrait, ArmError, AsyncHandle};
use crds::{ResourceStatus, RouteNextHopType, RouteSpec, RouteTable, RouteTableObserved};
use std::sync::Arc;

fn next_hop_name(next_hop: RouteNextHopType) -> &'static str {
    match next_hop {
        RouteNextHopType::VirtualNetworkGateway => "VirtualNetworkGateway",
        RouteNextHopType::VnetLocal => "VnetLocal",
        RouteNextHopType::Internet => "Internet",
        RouteNextHopType::VirtualAppliance => "VirtualAppliance",
        RouteNextHopType::None => "None",
    }
}

fn route_payload(route: &RouteSpec) -> arm_client::Route {
    arm_client::Route {
        name: Some(route.name.clone()),
        properties: Some(arm_client::RoutePropertiesFormat {
            address_prefix: Some(route.address_prefix.clone()),
            next_hop_type: Some(next_hop_name(route.next_hop_type).to_string()),
            next_hop_ip_address: route.next_hop_ip_address.clone(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Mutable view of one route: the fields the user controls, without the
/// provider-assigned id, etag, and provisioning state.
type RouteFields = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn route_fields(route: &arm_client::Route) -> RouteFields {
    let properties = route.properties.clone().unwrap_or_default();
    (
        route.name.clone(),
        properties.address_prefix,
        properties.next_hop_type,
        properties.next_hop_ip_address,
    )
}

impl ManagedResource for RouteTable {
    type Observed = RouteTableObserved;
    type Payload = arm_client::RouteTable;

    const KIND: ResourceKind = ResourceKind::RouteTable;

    fn external_name(&self) -> Result<&str, ReconcileError> {
        self.metadata
            .name
            .as_deref()
            .ok_or_else(|| ReconcileError::Config("RouteTable has no name".to_string()))
    }

    fn resource_group(&self) -> Result<&str, ReconcileError> {
        self.spec.resource_group_name.as_deref().ok_or_else(|| {
            ReconcileError::Config(
                "RouteTable resource group reference is not resolved".to_string(),
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
        arm_client::RouteTable {
            location: Some(self.spec.location.clone()),
            tags: self.spec.tags.clone(),
            properties: Some(arm_client::RouteTablePropertiesFormat {
                routes: if self.spec.routes.is_empty() {
                    None
                } else {
                    Some(self.spec.routes.iter().map(route_payload).collect())
                },
                disable_bgp_route_propagation: self.spec.disable_bgp_route_propagation,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn apply_observed(status: &mut ResourceStatus<Self::Observed>, payload: &Self::Payload) {
        apply_common_observed(status, payload);
        if let Some(subnets) = payload.properties.as_ref().and_then(|p| p.subnets.as_ref()) {
            status.observed.subnets = Some(subnets.iter().filter_map(|s| s.id.clone()).collect());
        }
    }

    fn needs_update(&self, observed: &Self::Payload) -> bool {
        let desired = self.to_payload();
        let desired_properties = desired.properties.unwrap_or_default();
        let observed_properties = observed.properties.clone().unwrap_or_default();

        // Routes are an ordered collection; comparison is order-sensitive
        // over the mutable route fields.
        let desired_routes: Vec<RouteFields> = desired_properties
            .routes
            .unwrap_or_default()
            .iter()
            .map(route_fields)
            .collect();
        let observed_routes: Vec<RouteFields> = observed_properties
            .routes
            .unwrap_or_default()
            .iter()
            .map(route_fields)
            .collect();

        desired_routes != observed_routes
            || desired_properties.disable_bgp_route_propagation
                != observed_properties.disable_bgp_route_propagation
            || desired.tags != observed.tags
    }
}

/// ARM client binding for route tables.
#[derive(Clone)]
pub struct RouteTableApi {
    client: Arc<dyn ArmClientTrait>,
}

impl std::fmt::Debug for RouteTableApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RouteTableApi")
    }
}

impl RouteTableApi {
    /// Bind the route table operations of an ARM client.
    #[must_use]
    pub fn new(client: Arc<dyn ArmClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ExternalApi<arm_client::RouteTable> for RouteTableApi {
    async fn get(&self, resource_group: &str, name: &str) -> Result<arm_client::RouteTable, ArmError> {
        self.client.get_route_table(resource_group, name).await
    }

    async fn create_or_update(&self, resource_group: &str, name: &str, payload: &arm_client::RouteTable) -> Result<AsyncHandle, ArmError> {
        self.client
            .create_or_update_route_table(resource_group, name, payload)
            .await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        self.client.delete_route_table(resource_group, name).await
    }
}

#[async_trait::async_trait]
impl Connecter<RouteTable> for ArmConnecter {
    type Api = RouteTableApi;

    async fn connect(&self, _record: &RouteTable) -> Result<Self::Api, ReconcileError> {
        let client = self.client().map_err(|source| ReconcileError::Connect {
            kind: ResourceKind::RouteTable,
            source,
        })?;
        Ok(RouteTableApi::new(client))
    }
}
