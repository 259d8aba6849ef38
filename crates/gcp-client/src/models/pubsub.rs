//! Pub/Sub v1 models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Topic
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub message_storage_policy: Option<MessageStoragePolicy>,
    pub kms_key_name: String,
    pub message_retention_duration: String,
    pub state: String,
}

/// Regions where messages may be stored
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageStoragePolicy {
    pub allowed_persistence_regions: Vec<String>,
}

/// Subscription
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Subscription {
    pub name: String,
    pub topic: String,
    pub ack_deadline_seconds: i64,
    pub labels: BTreeMap<String, String>,
    pub message_retention_duration: String,
    pub retain_acked_messages: bool,
    pub enable_message_ordering: bool,
    pub filter: String,
    pub expiration_policy: Option<ExpirationPolicy>,
    pub dead_letter_policy: Option<DeadLetterPolicy>,
    pub push_config: Option<PushConfig>,
    pub retry_policy: Option<RetryPolicy>,
    pub state: String,
}

/// Inactivity expiry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpirationPolicy {
    pub ttl: String,
}

/// Dead-letter forwarding
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DeadLetterPolicy {
    pub dead_letter_topic: String,
    pub max_delivery_attempts: i64,
}

/// Push delivery
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PushConfig {
    pub push_endpoint: String,
    pub attributes: BTreeMap<String, String>,
    pub oidc_token: Option<OidcToken>,
}

/// OIDC token attached to push requests
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OidcToken {
    pub service_account_email: String,
    pub audience: String,
}

/// Redelivery backoff
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryPolicy {
    pub minimum_backoff: String,
    pub maximum_backoff: String,
}
