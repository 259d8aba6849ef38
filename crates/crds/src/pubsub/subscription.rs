//! Subscription Custom Resource Definition
//!
//! A Pub/Sub subscription to a topic.

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// SubscriptionSpec defines the desired state of a Subscription
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "pubsub.gcp.crossplane.io",
    version = "v1alpha1",
    kind = "Subscription",
    status = "SubscriptionStatus",
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
pub struct SubscriptionSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    pub for_provider: SubscriptionParameters,
}

/// SubscriptionParameters mirror the Pub/Sub Subscription payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionParameters {
    /// Name of the topic (the Topic's external name). Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Topic to resolve `topic` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_ref: Option<Reference>,

    /// Selects a Topic to resolve `topic` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_selector: Option<Selector>,

    /// Seconds a subscriber has to acknowledge a message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_deadline_seconds: Option<i64>,

    /// Labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// How long unacknowledged messages are retained, e.g. "604800s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_retention_duration: Option<String>,

    /// Keep acknowledged messages for the retention duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retain_acked_messages: Option<bool>,

    /// Deliver messages with the same ordering key in order. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_message_ordering: Option<bool>,

    /// Only deliver messages matching this filter. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// When the subscription expires when inactive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_policy: Option<ExpirationPolicy>,

    /// Where undeliverable messages go
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_letter_policy: Option<DeadLetterPolicy>,

    /// Push delivery; pull when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_config: Option<PushConfig>,

    /// Redelivery backoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
}

/// Expiration policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationPolicy {
    /// Inactivity period after which the subscription is deleted
    pub ttl: String,
}

/// Dead letter policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterPolicy {
    /// projects/*/topics/* receiving dead letters
    pub dead_letter_topic: String,

    /// Delivery attempts before dead-lettering, 5-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delivery_attempts: Option<i64>,
}

/// Push configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PushConfig {
    /// Endpoint URL
    pub push_endpoint: String,

    /// Endpoint attributes, e.g. x-goog-version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,

    /// OIDC token attached to push requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_token: Option<OidcToken>,
}

/// OIDC token settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OidcToken {
    pub service_account_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

/// Retry policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_backoff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_backoff: Option<String>,
}

/// SubscriptionObservation is the observed state of a Subscription
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionObservation {
    /// ACTIVE or RESOURCE_ERROR
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
}

/// SubscriptionStatus is the observed state of a Subscription
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: SubscriptionObservation,
}

impl_managed!(Subscription, SubscriptionStatus, SubscriptionParameters, SubscriptionObservation);
