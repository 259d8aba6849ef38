//! SecretVersion Custom Resource Definition
//!
//! A version of a Secret Manager secret. The payload is read from a
//! Kubernetes Secret key. The external name is the version id GCP assigns
//! when the version is added.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::references::{Reference, SecretKeySelector, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// SecretVersionSpec defines the desired state of a SecretVersion
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "secretsmanager.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "SecretVersion",
    status = "SecretVersionStatus",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "gcp",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"STATE","type":"string","jsonPath":".status.atProvider.state"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME","type":"string","jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersionSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    pub for_provider: SecretVersionParameters,
}

/// SecretVersionParameters define the desired state of a secret version
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersionParameters {
    /// Name of the secret (the Secret's external name). Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Secret to resolve `secret` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<Reference>,

    /// Selects a Secret to resolve `secret` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_selector: Option<Selector>,

    /// Payload source. Immutable.
    pub payload: SecretVersionPayload,

    /// Desired state. Defaults to ENABLED. A DESTROYED version cannot be revived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_secret_version_state: Option<SecretVersionState>,
}

/// Where the payload of a secret version comes from
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersionPayload {
    /// Kubernetes Secret key holding the payload
    pub secret_key_ref: SecretKeySelector,
}

/// State of a secret version
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecretVersionState {
    #[default]
    Enabled,
    Disabled,
    Destroyed,
}

impl SecretVersionState {
    /// Secret Manager API value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
            Self::Destroyed => "DESTROYED",
        }
    }

    /// Parse a Secret Manager API value
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "ENABLED" => Some(Self::Enabled),
            "DISABLED" => Some(Self::Disabled),
            "DESTROYED" => Some(Self::Destroyed),
            _ => None,
        }
    }
}

/// SecretVersionObservation is the observed state of a SecretVersion
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersionObservation {
    /// Resource name, projects/*/secrets/*/versions/*
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub create_time: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub destroy_time: String,

    /// ENABLED, DISABLED or DESTROYED
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
}

/// SecretVersionStatus is the observed state of a SecretVersion
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersionStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: SecretVersionObservation,
}

impl_managed!(
    SecretVersion,
    SecretVersionStatus,
    SecretVersionParameters,
    SecretVersionObservation
);
