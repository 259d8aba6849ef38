//! Pub/Sub translation

pub mod subscription;
pub mod topic;
