//! Pub/Sub resources (pubsub.gcp.crossplane.io)

pub mod subscription;
pub mod topic;

pub use subscription::*;
pub use topic::*;
