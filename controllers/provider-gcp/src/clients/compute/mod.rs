//! Compute Engine translators

pub mod address;
pub mod firewall;
pub mod global_address;
pub mod network;
pub mod subnetwork;
