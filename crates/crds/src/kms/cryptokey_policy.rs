//! CryptoKeyPolicy Custom Resource Definition
//!
//! The IAM policy attached to a Cloud KMS crypto key.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// CryptoKeyPolicySpec defines the desired state of a CryptoKeyPolicy
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "kms.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "CryptoKeyPolicy",
    status = "CryptoKeyPolicyStatus",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "gcp",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyPolicySpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    pub for_provider: CryptoKeyPolicyParameters,
}

/// CryptoKeyPolicyParameters define the desired IAM policy of a crypto key
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyPolicyParameters {
    /// Resource name of the crypto key. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_key: Option<String>,

    /// CryptoKey to resolve `cryptoKey` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_key_ref: Option<Reference>,

    /// Selects a CryptoKey to resolve `cryptoKey` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_key_selector: Option<Selector>,

    /// The policy
    pub policy: Policy,
}

/// An IAM policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Role bindings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<Binding>,
}

/// Binds members to a role
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Role, e.g. roles/cloudkms.cryptoKeyEncrypterDecrypter
    pub role: String,

    /// Members, e.g. user:alice@example.com or serviceAccount:sa@p.iam.gserviceaccount.com
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    /// ServiceAccounts whose emails are added as members
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_account_member_refs: Vec<Reference>,

    /// Selects ServiceAccounts whose emails are added as members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_member_selector: Option<Selector>,

    /// Condition restricting the binding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expr>,
}

/// A CEL expression
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Expr {
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// CryptoKeyPolicyObservation is the observed state of a CryptoKeyPolicy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyPolicyObservation {
    /// Etag of the observed policy
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etag: String,

    /// Policy format version
    #[serde(default)]
    pub version: i64,
}

/// CryptoKeyPolicyStatus is the observed state of a CryptoKeyPolicy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyPolicyStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: CryptoKeyPolicyObservation,
}

impl_managed!(
    CryptoKeyPolicy,
    CryptoKeyPolicyStatus,
    CryptoKeyPolicyParameters,
    CryptoKeyPolicyObservation
);
