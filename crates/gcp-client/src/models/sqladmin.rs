//! Cloud SQL Admin v1beta4 models
//!
//! See: https://cloud.google.com/sql/docs/mysql/admin-api/rest/v1beta4/instances

use crate::common::wire::int64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cloud SQL instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseInstance {
    pub name: String,
    pub project: String,
    pub region: String,
    pub database_version: String,
    pub master_instance_name: String,
    pub gce_zone: String,
    pub instance_type: String,
    #[serde(with = "int64")]
    pub max_disk_size: i64,
    pub disk_encryption_configuration: Option<DiskEncryptionConfiguration>,
    pub settings: Option<Settings>,
    pub root_password: String,
    pub backend_type: String,
    pub connection_name: String,
    pub ip_addresses: Vec<IpMapping>,
    pub ipv6_address: String,
    pub self_link: String,
    pub server_ca_cert: Option<SslCert>,
    pub service_account_email_address: String,
    pub state: String,
}

/// Customer-managed encryption key of the data disk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DiskEncryptionConfiguration {
    pub kms_key_name: String,
}

/// Instance settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub tier: String,
    pub activation_policy: String,
    pub authorized_gae_applications: Vec<String>,
    pub availability_type: String,
    pub backup_configuration: Option<BackupConfiguration>,
    #[serde(with = "int64")]
    pub data_disk_size_gb: i64,
    pub data_disk_type: String,
    pub database_flags: Vec<DatabaseFlags>,
    pub ip_configuration: Option<IpConfiguration>,
    pub location_preference: Option<LocationPreference>,
    pub maintenance_window: Option<MaintenanceWindow>,
    pub pricing_plan: String,
    pub replication_type: String,
    #[serde(with = "int64")]
    pub settings_version: i64,
    pub storage_auto_resize: bool,
    #[serde(with = "int64")]
    pub storage_auto_resize_limit: i64,
    pub user_labels: BTreeMap<String, String>,
    #[serde(rename = "forceSendFields", skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub force_send_fields: Vec<String>,
}

/// Backup schedule
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BackupConfiguration {
    pub binary_log_enabled: bool,
    pub enabled: bool,
    pub location: String,
    pub point_in_time_recovery_enabled: bool,
    pub start_time: String,
    #[serde(rename = "forceSendFields", skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub force_send_fields: Vec<String>,
}

/// Database flag
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseFlags {
    pub name: String,
    pub value: String,
}

/// IP connectivity settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IpConfiguration {
    pub authorized_networks: Vec<AclEntry>,
    pub ipv4_enabled: bool,
    pub private_network: String,
    pub require_ssl: bool,
    #[serde(rename = "forceSendFields", skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub force_send_fields: Vec<String>,
}

/// Network allowed to connect
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AclEntry {
    pub name: String,
    pub value: String,
    pub expiration_time: String,
}

/// Preferred zone
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationPreference {
    pub zone: String,
}

/// Maintenance window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MaintenanceWindow {
    pub day: i64,
    pub hour: i64,
    pub update_track: String,
}

/// Address assigned to an instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IpMapping {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub time_to_retire: String,
}

/// Server CA certificate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SslCert {
    pub cert: String,
    pub common_name: String,
    pub expiration_time: String,
    pub sha1_fingerprint: String,
}

/// Address type of the public IP
pub const IP_TYPE_PRIMARY: &str = "PRIMARY";
/// Address type of the private IP
pub const IP_TYPE_PRIVATE: &str = "PRIVATE";
