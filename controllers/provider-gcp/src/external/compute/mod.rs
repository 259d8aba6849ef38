//! Compute Engine external clients
//!
//! Handles: Network, Subnetwork, Firewall, Address, GlobalAddress
//!
//! Compute mutations return long-running operations. They are not awaited;
//! the next observe sees the result, so deletes report `Deletion::Pending`.

pub mod address;
pub mod firewall;
pub mod network;
pub mod subnetwork;
