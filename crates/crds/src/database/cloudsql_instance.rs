//! CloudSQLInstance Custom Resource Definition
//!
//! A Cloud SQL database instance (MySQL, PostgreSQL or SQL Server).

use crate::common::{ResourceSpec, ResourceStatus, impl_managed};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CloudSQLInstanceSpec defines the desired state of a CloudSQLInstance
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "database.gcp.crossplane.io",
    version = "v1beta1",
    kind = "CloudSQLInstance",
    status = "CloudSQLInstanceStatus",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "gcp",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"STATE","type":"string","jsonPath":".status.atProvider.state"}"#,
    printcolumn = r#"{"name":"VERSION","type":"string","jsonPath":".spec.forProvider.databaseVersion"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME","type":"string","jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CloudSQLInstanceSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,

    /// Desired state of the instance
    pub for_provider: CloudSQLInstanceParameters,
}

/// CloudSQLInstanceParameters mirror the Cloud SQL Admin v1beta4
/// DatabaseInstance payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CloudSQLInstanceParameters {
    /// Region of the instance. Immutable.
    pub region: String,

    /// Database engine and version, e.g. POSTGRES_15 or MYSQL_8_0. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,

    /// Name of the primary instance, for read replicas. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_instance_name: Option<String>,

    /// Compute Engine zone the instance is currently serving from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gce_zone: Option<String>,

    /// CLOUD_SQL_INSTANCE, ON_PREMISES_INSTANCE or READ_REPLICA_INSTANCE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,

    /// Maximum disk size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_disk_size: Option<i64>,

    /// Customer-managed encryption key. Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_encryption_configuration: Option<DiskEncryptionConfiguration>,

    /// Instance settings
    pub settings: Settings,
}

/// Customer-managed encryption configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DiskEncryptionConfiguration {
    /// Resource name of the KMS key
    pub kms_key_name: String,
}

/// Cloud SQL instance settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Machine tier, e.g. db-custom-1-3840
    pub tier: String,

    /// ALWAYS, NEVER or ON_DEMAND
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_policy: Option<String>,

    /// App Engine app IDs allowed to access the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_gae_applications: Option<Vec<String>>,

    /// ZONAL or REGIONAL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_type: Option<String>,

    /// Daily backup configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_configuration: Option<BackupConfiguration>,

    /// Data disk size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_disk_size_gb: Option<i64>,

    /// PD_SSD or PD_HDD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_disk_type: Option<String>,

    /// Database flags passed at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_flags: Option<Vec<DatabaseFlag>>,

    /// IP management
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_configuration: Option<IpConfiguration>,

    /// Preferred zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_preference: Option<LocationPreference>,

    /// Preferred maintenance window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_window: Option<MaintenanceWindow>,

    /// PER_USE or PACKAGE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_plan: Option<String>,

    /// SYNCHRONOUS or ASYNCHRONOUS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_type: Option<String>,

    /// Grow storage automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_auto_resize: Option<bool>,

    /// Upper bound for automatic storage growth in GB, 0 means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_auto_resize_limit: Option<i64>,

    /// User labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_labels: Option<BTreeMap<String, String>>,
}

/// Backup configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfiguration {
    /// Binary logging (MySQL only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_log_enabled: Option<bool>,

    /// Whether backups are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Backup location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Point-in-time recovery (PostgreSQL only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_in_time_recovery_enabled: Option<bool>,

    /// Start time of the backup window in UTC, HH:MM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

/// A database flag
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseFlag {
    pub name: String,
    pub value: String,
}

/// IP configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IpConfiguration {
    /// External networks allowed to connect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_networks: Option<Vec<AclEntry>>,

    /// Whether the instance has a public IPv4 address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_enabled: Option<bool>,

    /// URL of the VPC network providing private IP connectivity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_network: Option<String>,

    /// Network to resolve `privateNetwork` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_network_ref: Option<Reference>,

    /// Selects a Network to resolve `privateNetwork` from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_network_selector: Option<Selector>,

    /// Require SSL connections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_ssl: Option<bool>,
}

/// An authorized network entry
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AclEntry {
    /// Label for the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Address or CIDR range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// When the entry expires, RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
}

/// Location preference
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocationPreference {
    /// Preferred Compute Engine zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

/// Maintenance window
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    /// Day of week, 1-7 starting on Monday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,

    /// Hour of day, 0-23
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,

    /// canary or stable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_track: Option<String>,
}

/// Instance state that maps to Ready=True
pub const STATE_RUNNABLE: &str = "RUNNABLE";
/// Instance state while the instance is first created
pub const STATE_PENDING_CREATE: &str = "PENDING_CREATE";
/// Instance state during maintenance
pub const STATE_MAINTENANCE: &str = "MAINTENANCE";

/// CloudSQLInstanceObservation is the observed state of a CloudSQLInstance
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CloudSQLInstanceObservation {
    /// FIRST_GEN, SECOND_GEN or EXTERNAL
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub backend_type: String,

    /// Connection name used by the Cloud SQL proxy
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub connection_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gce_zone: String,

    /// Addresses assigned to the instance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<IpMapping>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ipv6_address: String,

    /// Project the instance lives in
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,

    /// Service account used by the instance
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_account_email_address: String,

    /// RUNNABLE, PENDING_CREATE, MAINTENANCE, FAILED, ...
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,

    /// Settings version, required for optimistic updates
    #[serde(default)]
    pub settings_version: i64,
}

/// An IP address assigned to the instance
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IpMapping {
    pub ip_address: String,
    /// PRIMARY, OUTGOING or PRIVATE
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub time_to_retire: String,
}

/// CloudSQLInstanceStatus is the observed state of a CloudSQLInstance
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CloudSQLInstanceStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,

    #[serde(default)]
    pub at_provider: CloudSQLInstanceObservation,
}

impl_managed!(
    CloudSQLInstance,
    CloudSQLInstanceStatus,
    CloudSQLInstanceParameters,
    CloudSQLInstanceObservation
);
