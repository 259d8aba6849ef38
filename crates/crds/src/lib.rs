//! GCP provider CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for GCP managed resources and the
//! ProviderConfig they connect with. Every managed resource has the same
//! shape: `spec.forProvider` (Parameters) next to the inlined generic
//! resource spec, and `status.atProvider` (Observation) next to the inlined
//! conditions.

pub mod common;
pub mod compute;
pub mod database;
pub mod iam;
pub mod kms;
pub mod provider_config;
pub mod pubsub;
pub mod references;
pub mod registry;
pub mod secretsmanager;

pub use common::*;
pub use compute::*;
pub use database::*;
pub use iam::*;
pub use kms::*;
pub use provider_config::*;
pub use pubsub::*;
pub use references::*;
pub use registry::{AnyManaged, KINDS, Kind, RegistryError, all_crds};
pub use secretsmanager::*;
