//! IAM resources (iam.gcp.crossplane.io)

pub mod service_account;

pub use service_account::*;
