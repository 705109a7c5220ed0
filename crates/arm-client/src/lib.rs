//! Azure Resource Manager REST API Client
//!
//! A Rust client library for the ARM REST API surface the Azure-sync
//! controllers manage. Provides wire-shaped payload models and per-kind
//! get / create-or-update / delete operations for network resources.
//!
//! # Example
//!
//! ```no_run
//! use arm_client::{AddressSpace, ArmClient, ArmClientTrait, VirtualNetwork, VirtualNetworkPropertiesFormat};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client bound to one subscription
//! let client = ArmClient::new(
//!     "https://management.azure.com".to_string(),
//!     "00000000-0000-0000-0000-000000000000".to_string(),
//!     "your-bearer-token".to_string(),
//! )?;
//!
//! // Upsert a virtual network
//! let network = VirtualNetwork {
//!     location: Some("eastus".to_string()),
//!     properties: Some(VirtualNetworkPropertiesFormat {
//!         address_space: Some(AddressSpace {
//!             address_prefixes: vec!["10.0.0.0/16".to_string()],
//!         }),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! client.create_or_update_virtual_network("prod-rg", "vnet-1", &network).await?;
//!
//! // Read it back
//! let observed = client.get_virtual_network("prod-rg", "vnet-1").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Per-kind operations**: virtual networks, public IP addresses, route tables
//! - **Total-replacement upserts**: `create_or_update_*` PUTs the full payload
//! - **Not-found classification**: HTTP 404 maps to [`ArmError::NotFound`],
//!   checked via [`ArmError::is_not_found`] rather than string matching
//! - **Async operation handles**: long-running PUT/DELETE responses surface
//!   their `Azure-AsyncOperation` URL

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod arm_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use arm_trait::ArmClientTrait;
pub use client::ArmClient;
pub use error::ArmError;
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::MockArmClient;
