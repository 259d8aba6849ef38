//! KeyRing Custom Resource Definition
//!
//! A Cloud KMS key ring. Key rings cannot be deleted from GCP.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// KeyRingSpec defines the desired state of a KeyRing
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "kms.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "KeyRing",
    status = "KeyRingStatus",
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
pub struct KeyRingSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    pub for_provider: KeyRingParameters,
}

/// KeyRingParameters define the desired state of a key ring
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyRingParameters {
    /// Location of the key ring, e.g. "global" or "us-east1". Immutable.
    pub location: String,
}

/// KeyRingObservation is the observed state of a KeyRing
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyRingObservation {
    /// Creation time
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub create_time: String,

    /// Resource name, projects/*/locations/*/keyRings/*
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// KeyRingStatus is the observed state of a KeyRing
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyRingStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: KeyRingObservation,
}

impl_managed!(KeyRing, KeyRingStatus, KeyRingParameters, KeyRingObservation);
