//! Azure Sync Controller
//!
//! Keeps Azure network resources synchronized with their declarative CRD
//! specs:
//! - VirtualNetwork: virtual networks and their address spaces
//! - PublicIPAddress: public IP addresses and DNS settings
//! - RouteTable: route tables and their routes
//!
//! Each kind runs the same Observe / Create / Update / Delete pass against
//! the ARM API; drift between spec and observed state converges through
//! full-payload upserts.

mod backoff;
mod connect;
mod controller;
mod error;
mod reconciler;
#[cfg(test)]
mod test_utils;
mod watcher;

use crate::connect::ArmCredentials;
use crate::error::ControllerError;
use controller::Controller;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting Azure sync controller");

    // Load configuration from environment variables
    let credentials = ArmCredentials::from_env()?;
    let namespace = env::var("WATCH_NAMESPACE").ok();

    info!("Configuration:");
    info!("  ARM endpoint: {}", credentials.endpoint);
    info!("  Subscription: {}", credentials.subscription_id);
    info!("  Namespace: {}", namespace.as_deref().unwrap_or("default"));

    // Initialize and run controller
    let controller = Controller::new(credentials, namespace).await?;
    controller.run().await?;

    Ok(())
}
