//! Secret Manager v1 models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Secret container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Secret {
    pub name: String,
    pub replication: Option<Replication>,
    pub labels: BTreeMap<String, String>,
    pub create_time: String,
}

/// Replication policy, exactly one of `automatic` and `user_managed`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Replication {
    pub automatic: Option<AutomaticReplication>,
    pub user_managed: Option<UserManagedReplication>,
    #[serde(rename = "forceSendFields", skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub force_send_fields: Vec<String>,
}

/// Google-chosen replication; an empty object on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AutomaticReplication {}

/// Replicas in chosen locations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserManagedReplication {
    pub replicas: Vec<Replica>,
}

/// Replica location
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Replica {
    pub location: String,
}

/// Secret version
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SecretVersion {
    pub name: String,
    pub create_time: String,
    pub destroy_time: String,
    pub state: String,
}

/// Payload of a secret version; `data` is base64
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SecretPayload {
    pub data: String,
}

/// Response of `versions:access`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessSecretVersionResponse {
    pub name: String,
    pub payload: Option<SecretPayload>,
}

/// Version is usable
pub const VERSION_STATE_ENABLED: &str = "ENABLED";
/// Version exists but cannot be accessed
pub const VERSION_STATE_DISABLED: &str = "DISABLED";
/// Version data is irrecoverably gone
pub const VERSION_STATE_DESTROYED: &str = "DESTROYED";
