//! Subnetwork Custom Resource Definition
//!
//! A regional subnetwork of a VPC network.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// SubnetworkSpec defines the desired state of a Subnetwork
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "compute.gcp.crossplane.io",
    version = "v1beta1",
    kind = "Subnetwork",
    status = "SubnetworkStatus",
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
pub struct SubnetworkSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    /// Desired state of the subnetwork
    pub for_provider: SubnetworkParameters,
}

/// SubnetworkParameters mirror the Compute Engine subnetwork insert payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubnetworkParameters {
    /// Optional description. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Primary internal address range, e.g. 10.0.0.0/8. Can only be expanded.
    pub ip_cidr_range: String,

    /// URL of the network this subnetwork belongs to. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// Network to resolve `network` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_ref: Option<Reference>,

    /// Selects a Network to resolve `network` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_selector: Option<Selector>,

    /// Region of the subnetwork. Immutable.
    pub region: String,

    /// Enable flow logging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_flow_logs: Option<bool>,

    /// VMs without external IPs can reach Google APIs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip_google_access: Option<bool>,

    /// Secondary ranges usable by alias IPs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_ip_ranges: Option<Vec<SubnetworkSecondaryRange>>,
}

/// A secondary address range of a subnetwork
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubnetworkSecondaryRange {
    /// Name of the range, unique within the subnetwork
    pub range_name: String,
    /// Address range in CIDR format
    pub ip_cidr_range: String,
}

/// SubnetworkObservation is the observed state of a Subnetwork
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubnetworkObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creation_timestamp: String,

    /// Fingerprint required for optimistic locking on patch
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,

    /// Gateway address for default routes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gateway_address: String,

    #[serde(default)]
    pub id: u64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,
}

/// SubnetworkStatus is the observed state of a Subnetwork
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubnetworkStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: SubnetworkObservation,
}

impl_managed!(Subnetwork, SubnetworkStatus, SubnetworkParameters, SubnetworkObservation);
