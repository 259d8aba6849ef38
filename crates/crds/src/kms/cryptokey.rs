//! CryptoKey Custom Resource Definition
//!
//! A Cloud KMS crypto key inside a key ring.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CryptoKeySpec defines the desired state of a CryptoKey
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "kms.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "CryptoKey",
    status = "CryptoKeyStatus",
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
pub struct CryptoKeySpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    pub for_provider: CryptoKeyParameters,
}

/// CryptoKeyParameters mirror the Cloud KMS CryptoKey payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyParameters {
    /// Resource name of the key ring, projects/*/locations/*/keyRings/*. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_ring: Option<String>,

    /// KeyRing to resolve `keyRing` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_ring_ref: Option<Reference>,

    /// Selects a KeyRing to resolve `keyRing` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_ring_selector: Option<Selector>,

    /// ENCRYPT_DECRYPT, ASYMMETRIC_SIGN, ASYMMETRIC_DECRYPT or MAC. Immutable.
    pub purpose: String,

    /// Automatic rotation period, e.g. "7776000s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_period: Option<String>,

    /// Time of the next automatic rotation, RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_rotation_time: Option<String>,

    /// Template for new key versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_template: Option<CryptoKeyVersionTemplate>,

    /// Labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

/// Template for new crypto key versions
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyVersionTemplate {
    /// SOFTWARE, HSM or EXTERNAL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection_level: Option<String>,

    /// Algorithm, e.g. GOOGLE_SYMMETRIC_ENCRYPTION
    pub algorithm: String,
}

/// CryptoKeyObservation is the observed state of a CryptoKey
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyObservation {
    /// Resource name, projects/*/locations/*/keyRings/*/cryptoKeys/*
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Primary version used for encryption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<CryptoKeyVersion>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub create_time: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_rotation_time: String,
}

/// An observed crypto key version
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyVersion {
    pub name: String,
    /// ENABLED, DISABLED, DESTROYED, ...
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protection_level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub algorithm: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub create_time: String,
}

/// CryptoKeyStatus is the observed state of a CryptoKey
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKeyStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: CryptoKeyObservation,
}

impl_managed!(CryptoKey, CryptoKeyStatus, CryptoKeyParameters, CryptoKeyObservation);
