//! Network resource kinds
//!
//! Handles: VirtualNetwork, PublicIPAddress, RouteTable

pub mod public_ip_address;
pub mod route_table;
pub mod virtual_network;

pub use public_ip_address::*;
pub use route_table::*;
pub use virtual_network::*;
