//! Topic Custom Resource Definition
//!
//! A Pub/Sub topic.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// TopicSpec defines the desired state of a Topic
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "pubsub.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "Topic",
    status = "TopicStatus",
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
pub struct TopicSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    pub for_provider: TopicParameters,
}

/// TopicParameters mirror the Pub/Sub Topic payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopicParameters {
    /// Labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Regions where messages may be stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_storage_policy: Option<MessageStoragePolicy>,

    /// KMS key protecting messages, projects/*/locations/*/keyRings/*/cryptoKeys/*. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_name: Option<String>,

    /// How long published messages are retained, e.g. "86400s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_retention_duration: Option<String>,
}

/// Message storage policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessageStoragePolicy {
    /// Allowed GCP regions
    pub allowed_persistence_regions: Vec<String>,
}

/// TopicObservation is the observed state of a Topic
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopicObservation {
    /// ACTIVE or INGESTION_RESOURCE_ERROR
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
}

/// TopicStatus is the observed state of a Topic
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopicStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: TopicObservation,
}

impl_managed!(Topic, TopicStatus, TopicParameters, TopicObservation);
