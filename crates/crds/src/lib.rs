//! Azure-sync CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the Azure-sync controllers.
//! Each managed kind carries a declarative spec plus a shared, generic
//! status record (`ResourceStatus`) with condition lifecycle semantics.

pub mod network;
pub mod references;
pub mod status;

pub use network::*;
pub use references::*;
pub use status::*;
