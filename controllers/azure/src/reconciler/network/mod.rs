//! Network kind adapters
//!
//! Handles: VirtualNetwork, PublicIPAddress, RouteTable

pub mod public_ip_address;
pub mod route_table;
pub mod virtual_network;

#[cfg(test)]
mod public_ip_address_test;
#[cfg(test)]
mod route_table_test;

use crds::ResourceStatus;

/// Common top-level fields every ARM payload carries.
pub(crate) trait ArmResourceFields {
    fn id(&self) -> Option<&str>;
    fn etag(&self) -> Option<&str>;
    fn resource_type(&self) -> Option<&str>;
    fn provisioning_state(&self) -> Option<&str>;
}

impl ArmResourceFields for arm_client::VirtualNetwork {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
    fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }
    fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
    }
}

impl ArmResourceFields for arm_client::PublicIpAddress {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
    fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }
    fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
    }
}

impl ArmResourceFields for arm_client::RouteTable {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
    fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }
    fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
    }
}

/// Copy the common observed fields into status. A field the payload omits
/// keeps its previous status value, so a partial provider response never
/// zeroes status.
pub(crate) fn apply_common_observed<O>(
    status: &mut ResourceStatus<O>,
    payload: &impl ArmResourceFields,
) {
    if let Some(id) = payload.id() {
        status.id = Some(id.to_string());
    }
    if let Some(etag) = payload.etag() {
        status.etag = Some(etag.to_string());
    }
    if let Some(resource_type) = payload.resource_type() {
        status.resource_type = Some(resource_type.to_string());
    }
    if let Some(state) = payload.provisioning_state() {
        status.provisioning_state = Some(state.to_string());
    }
}
