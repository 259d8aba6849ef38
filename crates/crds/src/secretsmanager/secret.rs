//! Secret Custom Resource Definition
//!
//! A Secret Manager secret. The secret holds no data itself; payloads live
//! in SecretVersions.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// SecretSpec defines the desired state of a Secret
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "secretsmanager.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "Secret",
    status = "SecretStatus",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "gcp",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME","type":"string","jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SecretSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    pub for_provider: SecretParameters,
}

/// SecretParameters mirror the Secret Manager Secret payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretParameters {
    /// Replication policy. Defaults to automatic. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<SecretReplication>,

    /// Labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

/// Replication policy of a secret; exactly one of the fields is set
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretReplication {
    /// Replicate without restriction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic: Option<bool>,

    /// Replicate into the listed locations only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_managed: Option<UserManagedReplication>,
}

/// User managed replication
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserManagedReplication {
    /// Replica locations
    pub replicas: Vec<Replica>,
}

/// A replica location
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Replica {
    /// Canonical location id, e.g. "us-east1"
    pub location: String,
}

/// SecretObservation is the observed state of a Secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub create_time: String,
}

/// SecretStatus is the observed state of a Secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: SecretObservation,
}

impl_managed!(Secret, SecretStatus, SecretParameters, SecretObservation);
