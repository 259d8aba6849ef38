//! Compute Engine v1 models
//!
//! See: https://cloud.google.com/compute/docs/reference/rest/v1

use crate::common::wire::uint64;
use serde::{Deserialize, Serialize};

/// Long-running operation returned by Compute and Cloud SQL mutations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    pub operation_type: String,
    pub status: String,
    pub target_link: String,
    pub self_link: String,
}

/// VPC network
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Network {
    pub name: String,
    pub description: String,
    pub auto_create_subnetworks: bool,
    pub routing_config: Option<NetworkRoutingConfig>,
    pub creation_timestamp: String,
    #[serde(rename = "gatewayIPv4")]
    pub gateway_ipv4: String,
    #[serde(with = "uint64")]
    pub id: u64,
    pub peerings: Vec<NetworkPeering>,
    pub self_link: String,
    pub subnetworks: Vec<String>,
    #[serde(rename = "forceSendFields", skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub force_send_fields: Vec<String>,
}

/// Dynamic routing mode of a network
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkRoutingConfig {
    pub routing_mode: String,
}

/// Peering between two networks
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkPeering {
    pub name: String,
    pub network: String,
    pub state: String,
    pub state_details: String,
    pub auto_create_routes: bool,
    pub exchange_subnet_routes: bool,
}

/// Regional subnetwork of a VPC network
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Subnetwork {
    pub name: String,
    pub description: String,
    pub ip_cidr_range: String,
    pub network: String,
    pub region: String,
    pub enable_flow_logs: bool,
    pub private_ip_google_access: bool,
    pub secondary_ip_ranges: Vec<SubnetworkSecondaryRange>,
    pub creation_timestamp: String,
    pub fingerprint: String,
    pub gateway_address: String,
    #[serde(with = "uint64")]
    pub id: u64,
    pub self_link: String,
    #[serde(rename = "forceSendFields", skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub force_send_fields: Vec<String>,
}

/// Secondary range of a subnetwork
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SubnetworkSecondaryRange {
    pub range_name: String,
    pub ip_cidr_range: String,
}

/// Firewall rule
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Firewall {
    pub name: String,
    pub description: String,
    pub network: String,
    pub priority: i64,
    pub source_ranges: Vec<String>,
    pub destination_ranges: Vec<String>,
    pub source_tags: Vec<String>,
    pub target_tags: Vec<String>,
    pub source_service_accounts: Vec<String>,
    pub target_service_accounts: Vec<String>,
    pub allowed: Vec<FirewallRule>,
    pub denied: Vec<FirewallRule>,
    pub direction: String,
    pub log_config: Option<FirewallLogConfig>,
    pub disabled: bool,
    pub creation_timestamp: String,
    #[serde(with = "uint64")]
    pub id: u64,
    pub self_link: String,
    #[serde(rename = "forceSendFields", skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub force_send_fields: Vec<String>,
}

/// Protocol and ports matched by an allow or deny rule
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FirewallRule {
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    pub ports: Vec<String>,
}

/// Firewall logging
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FirewallLogConfig {
    pub enable: bool,
    #[serde(rename = "forceSendFields", skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub force_send_fields: Vec<String>,
}

/// Reserved IP address, regional or global
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub name: String,
    pub address: String,
    pub address_type: String,
    pub description: String,
    pub ip_version: String,
    pub network: String,
    pub network_tier: String,
    pub prefix_length: i64,
    pub purpose: String,
    pub region: String,
    pub subnetwork: String,
    pub creation_timestamp: String,
    #[serde(with = "uint64")]
    pub id: u64,
    pub self_link: String,
    pub status: String,
    pub users: Vec<String>,
}
