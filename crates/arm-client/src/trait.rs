//! ArmClient trait for mocking
//!
//! This trait abstracts the ArmClient to enable mocking in unit tests.
//! The concrete ArmClient implements this trait, and tests can use mock
//! implementations.

use crate::error::ArmError;
use crate::models::*;

/// Trait for ARM API client operations
///
/// One get / create-or-update / delete triple per managed kind. The
/// create-or-update calls are total-replacement upserts: ARM treats PUT as
/// idempotent by resource identity, so a retried call against the same
/// name overwrites rather than duplicates.
///
/// All async methods must be `Send` to work with Tokio's work-stealing
/// runtime.
#[async_trait::async_trait]
pub trait ArmClientTrait: Send + Sync {
    /// The subscription this client is bound to
    fn subscription_id(&self) -> &str;

    /// Validate the bearer token and subscription reachability
    async fn validate_credentials(&self) -> Result<(), ArmError>;

    // Virtual network operations
    async fn get_virtual_network(&self, resource_group: &str, name: &str) -> Result<VirtualNetwork, ArmError>;
    async fn create_or_update_virtual_network(&self, resource_group: &str, name: &str, network: &VirtualNetwork) -> Result<AsyncHandle, ArmError>;
    async fn delete_virtual_network(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError>;

    // Public IP address operations
    async fn get_public_ip_address(&self, resource_group: &str, name: &str) -> Result<PublicIpAddress, ArmError>;
    async fn create_or_update_public_ip_address(&self, resource_group: &str, name: &str, address: &PublicIpAddress) -> Result<AsyncHandle, ArmError>;
    async fn delete_public_ip_address(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError>;

    // Route table operations
    async fn get_route_table(&self, resource_group: &str, name: &str) -> Result<RouteTable, ArmError>;
    async fn create_or_update_route_table(&self, resource_group: &str, name: &str, table: &RouteTable) -> Result<AsyncHandle, ArmError>;
    async fn delete_route_table(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError>;
}
