//! Main controller implementation.
//!
//! This module contains the `Controller` struct that validates provider
//! credentials, builds the per-kind reconciler registry, and runs one
//! watcher per managed kind:
//! - VirtualNetwork: Azure virtual networks
//! - PublicIPAddress: Azure public IP addresses
//! - RouteTable: Azure route tables

use crate::connect::{ArmConnecter, ArmCredentials};
use crate::error::ControllerError;
use crate::reconciler::Registry;
use crate::watcher::Watcher;
use arm_client::{ArmClient, ArmClientTrait};
use crds::{PublicIPAddress, RouteTable, VirtualNetwork};
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Main controller for Azure resource synchronization.
pub struct Controller {
    virtual_network_watcher: JoinHandle<Result<(), ControllerError>>,
    public_ip_address_watcher: JoinHandle<Result<(), ControllerError>>,
    route_table_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(
        credentials: ArmCredentials,
        namespace: Option<String>,
    ) -> Result<Self, ControllerError> {
        info!("Initializing Azure sync controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;

        // Validate credentials and reachability before watching anything
        info!("Validating ARM credentials and connectivity...");
        let probe = ArmClient::new(
            credentials.endpoint.clone(),
            credentials.subscription_id.clone(),
            credentials.token.clone(),
        )?;
        probe.validate_credentials().await.map_err(|e| {
            error!("Failed to validate ARM credentials: {}", e);
            error!("Please ensure:");
            error!("  1. AZURE_TOKEN holds a current bearer token for {}", credentials.endpoint);
            error!("  2. AZURE_SUBSCRIPTION_ID names a subscription that token can read");
            ControllerError::Arm(e)
        })?;
        info!("ARM credentials validated and connectivity established");

        // Create API clients for all managed kinds
        let ns = namespace.as_deref().unwrap_or("default");
        let virtual_network_api: Api<VirtualNetwork> = Api::namespaced(kube_client.clone(), ns);
        let public_ip_address_api: Api<PublicIPAddress> = Api::namespaced(kube_client.clone(), ns);
        let route_table_api: Api<RouteTable> = Api::namespaced(kube_client, ns);

        // One pass driver per kind, registered by tag at startup and
        // shared by reference with the watchers
        let registry = Arc::new(Registry::new(ArmConnecter::new(credentials)));

        let watcher = Arc::new(Watcher::new(
            registry,
            virtual_network_api,
            public_ip_address_api,
            route_table_api,
        ));

        let virtual_network_watcher = tokio::spawn({
            let watcher = Arc::clone(&watcher);
            async move { watcher.watch_virtual_networks().await }
        });
        let public_ip_address_watcher = tokio::spawn({
            let watcher = Arc::clone(&watcher);
            async move { watcher.watch_public_ip_addresses().await }
        });
        let route_table_watcher = tokio::spawn({
            let watcher = Arc::clone(&watcher);
            async move { watcher.watch_route_tables().await }
        });

        Ok(Self {
            virtual_network_watcher,
            public_ip_address_watcher,
            route_table_watcher,
        })
    }

    /// Runs until every watcher exits, surfacing the first failure.
    pub async fn run(self) -> Result<(), ControllerError> {
        let (virtual_networks, public_ip_addresses, route_tables) = tokio::join!(
            self.virtual_network_watcher,
            self.public_ip_address_watcher,
            self.route_table_watcher,
        );

        for result in [virtual_networks, public_ip_addresses, route_tables] {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("Watcher failed: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Watcher task panicked: {}", e);
                    return Err(ControllerError::Watch(e.to_string()));
                }
            }
        }
        Ok(())
    }
}
