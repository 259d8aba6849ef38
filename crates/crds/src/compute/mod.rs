//! Compute Engine resources (compute.gcp.crossplane.io)

pub mod address;
pub mod firewall;
pub mod global_address;
pub mod network;
pub mod subnetwork;

pub use address::*;
pub use firewall::*;
pub use global_address::*;
pub use network::*;
pub use subnetwork::*;
