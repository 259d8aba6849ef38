//! Firewall Custom Resource Definition
//!
//! A firewall rule of a VPC network.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// FirewallSpec defines the desired state of a Firewall
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "compute.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "Firewall",
    status = "FirewallStatus",
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
pub struct FirewallSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    /// Desired state of the firewall rule
    pub for_provider: FirewallParameters,
}

/// FirewallParameters mirror the Compute Engine firewall insert payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FirewallParameters {
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// URL of the network the rule applies to. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// Network to resolve `network` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_ref: Option<Reference>,

    /// Selects a Network to resolve `network` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_selector: Option<Selector>,

    /// Priority from 0 (highest) to 65535. Defaults to 1000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Source CIDR ranges (ingress)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ranges: Option<Vec<String>>,

    /// Destination CIDR ranges (egress)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ranges: Option<Vec<String>>,

    /// Source instance network tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tags: Option<Vec<String>>,

    /// Target instance network tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tags: Option<Vec<String>>,

    /// Source instance service accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_service_accounts: Option<Vec<String>>,

    /// Target instance service accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_service_accounts: Option<Vec<String>>,

    /// Connections permitted by the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<FirewallRule>>,

    /// Connections denied by the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied: Option<Vec<FirewallRule>>,

    /// Traffic direction. Defaults to INGRESS. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<FirewallDirection>,

    /// Firewall rule logging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_config: Option<FirewallLogConfig>,

    /// Whether the rule is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

/// Protocol and ports matched by an allow or deny rule
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    /// Protocol name (tcp, udp, icmp, esp, ah, sctp, ipip, all) or number
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,

    /// Ports or port ranges, e.g. "22" or "12345-12349"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<String>>,
}

/// Direction of traffic a firewall rule applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FirewallDirection {
    Ingress,
    Egress,
}

impl FirewallDirection {
    /// Compute API value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ingress => "INGRESS",
            Self::Egress => "EGRESS",
        }
    }

    /// Parse a Compute API value
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "INGRESS" => Some(Self::Ingress),
            "EGRESS" => Some(Self::Egress),
            _ => None,
        }
    }
}

/// Firewall rule logging
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FirewallLogConfig {
    /// Whether to export logs
    pub enable: bool,
}

/// FirewallObservation is the observed state of a Firewall
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FirewallObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creation_timestamp: String,

    #[serde(default)]
    pub id: u64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,
}

/// FirewallStatus is the observed state of a Firewall
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FirewallStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: FirewallObservation,
}

impl_managed!(Firewall, FirewallStatus, FirewallParameters, FirewallObservation);
