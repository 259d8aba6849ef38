//! GlobalAddress Custom Resource Definition
//!
//! A reserved global IP address or internal range, typically used to peer a
//! network with a service producer.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::compute::address::{AddressType, NetworkTier};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// GlobalAddressSpec defines the desired state of a GlobalAddress
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "compute.gcp.crossplane.io",
    version = "v1beta1",
    kind = "GlobalAddress",
    status = "GlobalAddressStatus",
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
pub struct GlobalAddressSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    /// Desired state of the global address
    pub for_provider: GlobalAddressParameters,
}

/// GlobalAddressParameters mirror the Compute Engine globalAddresses insert
/// payload. Global addresses cannot be changed after creation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAddressParameters {
    /// Static IP address to reserve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// INTERNAL or EXTERNAL. Defaults to EXTERNAL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_type: Option<AddressType>,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// IPV4 or IPV6
    #[serde(default, rename = "ipVersion", skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<String>,

    /// URL of the network the range is reserved in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// Network to resolve `network` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_ref: Option<Reference>,

    /// Selects a Network to resolve `network` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_selector: Option<Selector>,

    /// PREMIUM or STANDARD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_tier: Option<NetworkTier>,

    /// Prefix length of the reserved range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<i64>,

    /// Purpose, e.g. VPC_PEERING or PRIVATE_SERVICE_CONNECT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// GlobalAddressObservation is the observed state of a GlobalAddress
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAddressObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creation_timestamp: String,

    #[serde(default)]
    pub id: u64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,

    /// RESERVING, RESERVED or IN_USE
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
}

/// GlobalAddressStatus is the observed state of a GlobalAddress
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAddressStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: GlobalAddressObservation,
}

impl_managed!(GlobalAddress, GlobalAddressStatus, GlobalAddressParameters, GlobalAddressObservation);
