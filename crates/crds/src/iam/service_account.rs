//! ServiceAccount Custom Resource Definition
//!
//! A GCP IAM service account. The external name is the account id, the part
//! of the email before the `@`.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ServiceAccountSpec defines the desired state of a ServiceAccount
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "iam.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "ServiceAccount",
    status = "ServiceAccountStatus",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "gcp",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"EMAIL","type":"string","jsonPath":".status.atProvider.email"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    pub for_provider: ServiceAccountParameters,
}

/// ServiceAccountParameters define the desired state of a service account
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountParameters {
    /// Display name, at most 100 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Description, at most 256 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// ServiceAccountObservation is the observed state of a ServiceAccount
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountObservation {
    /// Resource name, projects/*/serviceAccounts/*
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unique_id: String,

    /// Email address of the account
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub oauth2_client_id: String,

    #[serde(default)]
    pub disabled: bool,
}

/// ServiceAccountStatus is the observed state of a ServiceAccount
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: ServiceAccountObservation,
}

impl_managed!(
    ServiceAccount,
    ServiceAccountStatus,
    ServiceAccountParameters,
    ServiceAccountObservation
);
