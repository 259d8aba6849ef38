//! Network Custom Resource Definition
//!
//! A VPC network in Compute Engine.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// NetworkSpec defines the desired state of a Network
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "compute.gcp.crossplane.io",
    version = "v1beta1",
    kind = "Network",
    status = "NetworkStatus",
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
pub struct NetworkSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    /// Desired state of the network
    pub for_provider: NetworkParameters,
}

/// NetworkParameters mirror the Compute Engine network insert payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParameters {
    /// Optional description. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Auto-create one subnetwork per region (auto mode). Setting this to
    /// false on an auto mode network switches it to custom mode; custom
    /// mode networks cannot go back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_subnetworks: Option<bool>,

    /// Network-wide routing configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_config: Option<NetworkRoutingConfig>,
}

/// Network-wide routing configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRoutingConfig {
    /// Whether Cloud Routers advertise regional or global routes
    pub routing_mode: RoutingMode,
}

/// Dynamic routing mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingMode {
    Regional,
    Global,
}

impl RoutingMode {
    /// Compute API value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regional => "REGIONAL",
            Self::Global => "GLOBAL",
        }
    }

    /// Parse a Compute API value
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "REGIONAL" => Some(Self::Regional),
            "GLOBAL" => Some(Self::Global),
            _ => None,
        }
    }
}

/// NetworkObservation is the observed state of a Network
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkObservation {
    /// Creation timestamp in RFC3339 text format
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creation_timestamp: String,

    /// Gateway address for default routing out of the network
    #[serde(default, rename = "gatewayIPv4", skip_serializing_if = "String::is_empty")]
    pub gateway_ipv4: String,

    /// Server-assigned identifier
    #[serde(default)]
    pub id: u64,

    /// Peerings of this network
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peerings: Vec<NetworkPeering>,

    /// Server-defined URL of the network
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,

    /// URLs of the subnetworks in this network
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnetworks: Vec<String>,
}

/// A peering between two networks
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPeering {
    pub name: String,
    /// URL of the peer network
    pub network: String,
    /// ACTIVE or INACTIVE
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state_details: String,
    #[serde(default)]
    pub exchange_subnet_routes: bool,
}

/// NetworkStatus is the observed state of a Network
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    /// Observed provider state
    #[serde(default)]
    pub at_provider: NetworkObservation,
}

impl_managed!(Network, NetworkStatus, NetworkParameters, NetworkObservation);
