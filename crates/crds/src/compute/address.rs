//! Address Custom Resource Definition
//!
//! A reserved regional IP address.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// AddressSpec defines the desired state of an Address
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "compute.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "Address",
    status = "AddressStatus",
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
pub struct AddressSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    /// Desired state of the address
    pub for_provider: AddressParameters,
}

/// AddressParameters mirror the Compute Engine address insert payload.
/// Addresses cannot be changed after creation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressParameters {
    /// Static IP address to reserve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// INTERNAL or EXTERNAL. Defaults to EXTERNAL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_type: Option<AddressType>,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// URL of the network, for VPC_PEERING and IPSEC_INTERCONNECT purposes
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

    /// Prefix length for ranges reserved for VPC peering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<i64>,

    /// Purpose of an internal address, e.g. GCE_ENDPOINT or SHARED_LOADBALANCER_VIP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    /// Region of the address
    pub region: String,

    /// URL of the subnetwork an internal address is reserved in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnetwork: Option<String>,

    /// Subnetwork to resolve `subnetwork` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnetwork_ref: Option<Reference>,

    /// Selects a Subnetwork to resolve `subnetwork` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnetwork_selector: Option<Selector>,
}

/// Type of a reserved address
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    Internal,
    External,
}

impl AddressType {
    /// Compute API value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::External => "EXTERNAL",
        }
    }

    /// Parse a Compute API value
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "INTERNAL" => Some(Self::Internal),
            "EXTERNAL" => Some(Self::External),
            _ => None,
        }
    }
}

/// Networking tier of an external address
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkTier {
    Premium,
    Standard,
}

impl NetworkTier {
    /// Compute API value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Premium => "PREMIUM",
            Self::Standard => "STANDARD",
        }
    }

    /// Parse a Compute API value
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "PREMIUM" => Some(Self::Premium),
            "STANDARD" => Some(Self::Standard),
            _ => None,
        }
    }
}

/// Reservation state reported for RESERVING addresses
pub const ADDRESS_STATUS_RESERVING: &str = "RESERVING";
/// Reservation state reported for reserved, unused addresses
pub const ADDRESS_STATUS_RESERVED: &str = "RESERVED";
/// Reservation state reported for addresses attached to a resource
pub const ADDRESS_STATUS_IN_USE: &str = "IN_USE";

/// AddressObservation is the observed state of an Address
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creation_timestamp: String,

    #[serde(default)]
    pub id: u64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,

    /// RESERVING, RESERVED or IN_USE
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    /// URLs of resources using this address
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
}

/// AddressStatus is the observed state of an Address
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: AddressObservation,
}

impl_managed!(Address, AddressStatus, AddressParameters, AddressObservation);
