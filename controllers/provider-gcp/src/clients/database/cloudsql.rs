//! CloudSQLInstance translation
//!
//! Patches carry the observed `settingsVersion`; Cloud SQL rejects a patch
//! whose version is stale.

use crate::clients::{late_init_bool, late_init_i64, late_init_map, late_init_nested, late_init_string, late_init_vec};
use crate::error::ControllerError;
use crate::managed::ConnectionDetails;
use crds::{
    AclEntry, BackupConfiguration, CloudSQLInstanceObservation, CloudSQLInstanceParameters, Condition, DatabaseFlag,
    IpConfiguration, IpMapping, LocationPreference, MaintenanceWindow, STATE_PENDING_CREATE, STATE_RUNNABLE, Settings,
};
use gcp_client::common::wire::{equivalent, force_send};
use gcp_client::models::sqladmin as gcp;

/// Connection detail key: address clients connect to
pub const ENDPOINT_KEY: &str = "endpoint";
/// Connection detail key: admin user
pub const USERNAME_KEY: &str = "username";
/// Connection detail key: admin password
pub const PASSWORD_KEY: &str = "password";
/// Connection detail key: public IP
pub const PUBLIC_IP_KEY: &str = "publicIP";
/// Connection detail key: private IP
pub const PRIVATE_IP_KEY: &str = "privateIP";
/// Connection detail key: server CA certificate
pub const SERVER_CA_CERT_KEY: &str = "serverCACertificateCert";
/// Connection detail key: `project:region:instance`
pub const CONNECTION_NAME_KEY: &str = "connectionName";

/// Write `params` into `instance`
pub fn generate_database_instance(name: &str, params: &CloudSQLInstanceParameters, instance: &mut gcp::DatabaseInstance) {
    instance.name = name.to_string();
    instance.region.clone_from(&params.region);
    instance.database_version = params.database_version.clone().unwrap_or_default();
    instance.master_instance_name = params.master_instance_name.clone().unwrap_or_default();
    instance.gce_zone = params.gce_zone.clone().unwrap_or_default();
    instance.instance_type = params.instance_type.clone().unwrap_or_default();
    instance.max_disk_size = params.max_disk_size.unwrap_or_default();
    if let Some(dec) = &params.disk_encryption_configuration {
        instance.disk_encryption_configuration = Some(gcp::DiskEncryptionConfiguration {
            kms_key_name: dec.kms_key_name.clone(),
        });
    }
    generate_settings(&params.settings, instance.settings.get_or_insert_with(Default::default));
}

fn generate_settings(params: &Settings, settings: &mut gcp::Settings) {
    settings.tier.clone_from(&params.tier);
    settings.activation_policy = params.activation_policy.clone().unwrap_or_default();
    settings.authorized_gae_applications = params.authorized_gae_applications.clone().unwrap_or_default();
    settings.availability_type = params.availability_type.clone().unwrap_or_default();
    if let Some(bc) = &params.backup_configuration {
        let mut backup = gcp::BackupConfiguration {
            binary_log_enabled: bc.binary_log_enabled.unwrap_or_default(),
            enabled: bc.enabled.unwrap_or_default(),
            location: bc.location.clone().unwrap_or_default(),
            point_in_time_recovery_enabled: bc.point_in_time_recovery_enabled.unwrap_or_default(),
            start_time: bc.start_time.clone().unwrap_or_default(),
            force_send_fields: Vec::new(),
        };
        force_send_false(&mut backup.force_send_fields, "binaryLogEnabled", bc.binary_log_enabled);
        force_send_false(&mut backup.force_send_fields, "enabled", bc.enabled);
        force_send_false(
            &mut backup.force_send_fields,
            "pointInTimeRecoveryEnabled",
            bc.point_in_time_recovery_enabled,
        );
        settings.backup_configuration = Some(backup);
    }
    settings.data_disk_size_gb = params.data_disk_size_gb.unwrap_or_default();
    settings.data_disk_type = params.data_disk_type.clone().unwrap_or_default();
    settings.database_flags = params
        .database_flags
        .iter()
        .flatten()
        .map(|f| gcp::DatabaseFlags {
            name: f.name.clone(),
            value: f.value.clone(),
        })
        .collect();
    if let Some(ic) = &params.ip_configuration {
        let mut ip = gcp::IpConfiguration {
            authorized_networks: ic
                .authorized_networks
                .iter()
                .flatten()
                .map(|n| gcp::AclEntry {
                    name: n.name.clone().unwrap_or_default(),
                    value: n.value.clone().unwrap_or_default(),
                    expiration_time: n.expiration_time.clone().unwrap_or_default(),
                })
                .collect(),
            ipv4_enabled: ic.ipv4_enabled.unwrap_or_default(),
            private_network: ic.private_network.clone().unwrap_or_default(),
            require_ssl: ic.require_ssl.unwrap_or_default(),
            force_send_fields: Vec::new(),
        };
        // Cloud SQL enables public IP unless told otherwise
        force_send_false(&mut ip.force_send_fields, "ipv4Enabled", ic.ipv4_enabled);
        force_send_false(&mut ip.force_send_fields, "requireSsl", ic.require_ssl);
        settings.ip_configuration = Some(ip);
    }
    if let Some(lp) = &params.location_preference {
        settings.location_preference = Some(gcp::LocationPreference {
            zone: lp.zone.clone().unwrap_or_default(),
        });
    }
    if let Some(mw) = &params.maintenance_window {
        settings.maintenance_window = Some(gcp::MaintenanceWindow {
            day: mw.day.unwrap_or_default(),
            hour: mw.hour.unwrap_or_default(),
            update_track: mw.update_track.clone().unwrap_or_default(),
        });
    }
    settings.pricing_plan = params.pricing_plan.clone().unwrap_or_default();
    settings.replication_type = params.replication_type.clone().unwrap_or_default();
    settings.storage_auto_resize = params.storage_auto_resize.unwrap_or_default();
    force_send_false(&mut settings.force_send_fields, "storageAutoResize", params.storage_auto_resize);
    settings.storage_auto_resize_limit = params.storage_auto_resize_limit.unwrap_or_default();
    settings.user_labels = params.user_labels.clone().unwrap_or_default();
}

/// An explicit `false` has to reach the API; its default may be `true`
fn force_send_false(list: &mut Vec<String>, field: &str, value: Option<bool>) {
    if value == Some(false) {
        force_send(list, field);
    }
}

/// PATCH body for `params`, pinned to the observed settings version
pub fn generate_database_instance_update(
    name: &str,
    params: &CloudSQLInstanceParameters,
    settings_version: i64,
) -> gcp::DatabaseInstance {
    let mut instance = gcp::DatabaseInstance::default();
    generate_database_instance(name, params, &mut instance);
    if let Some(settings) = instance.settings.as_mut() {
        settings.settings_version = settings_version;
    }
    instance
}

/// Observation of `instance`
pub fn generate_cloudsql_observation(instance: &gcp::DatabaseInstance) -> CloudSQLInstanceObservation {
    CloudSQLInstanceObservation {
        backend_type: instance.backend_type.clone(),
        connection_name: instance.connection_name.clone(),
        gce_zone: instance.gce_zone.clone(),
        ip_addresses: instance
            .ip_addresses
            .iter()
            .map(|ip| IpMapping {
                ip_address: ip.ip_address.clone(),
                type_: ip.type_.clone(),
                time_to_retire: ip.time_to_retire.clone(),
            })
            .collect(),
        ipv6_address: instance.ipv6_address.clone(),
        project: instance.project.clone(),
        self_link: instance.self_link.clone(),
        service_account_email_address: instance.service_account_email_address.clone(),
        state: instance.state.clone(),
        settings_version: instance.settings.as_ref().map_or(0, |s| s.settings_version),
    }
}

/// Fill unset parameters from `instance`
pub fn late_initialize_cloudsql(params: &mut CloudSQLInstanceParameters, instance: &gcp::DatabaseInstance) {
    late_init_string(&mut params.database_version, &instance.database_version);
    late_init_string(&mut params.master_instance_name, &instance.master_instance_name);
    late_init_string(&mut params.gce_zone, &instance.gce_zone);
    late_init_string(&mut params.instance_type, &instance.instance_type);
    late_init_i64(&mut params.max_disk_size, instance.max_disk_size);
    if params.disk_encryption_configuration.is_none() {
        params.disk_encryption_configuration = instance
            .disk_encryption_configuration
            .as_ref()
            .filter(|d| !d.kms_key_name.is_empty())
            .map(|d| crds::DiskEncryptionConfiguration {
                kms_key_name: d.kms_key_name.clone(),
            });
    }
    if let Some(settings) = &instance.settings {
        late_initialize_settings(&mut params.settings, settings);
    }
}

fn late_initialize_settings(params: &mut Settings, settings: &gcp::Settings) {
    if params.tier.is_empty() {
        params.tier.clone_from(&settings.tier);
    }
    late_init_string(&mut params.activation_policy, &settings.activation_policy);
    late_init_vec(&mut params.authorized_gae_applications, &settings.authorized_gae_applications);
    late_init_string(&mut params.availability_type, &settings.availability_type);
    late_init_nested(
        &mut params.backup_configuration,
        settings.backup_configuration.as_ref(),
        |bc: &mut BackupConfiguration, o| {
            late_init_bool(&mut bc.binary_log_enabled, o.binary_log_enabled);
            late_init_bool(&mut bc.enabled, o.enabled);
            late_init_string(&mut bc.location, &o.location);
            late_init_bool(&mut bc.point_in_time_recovery_enabled, o.point_in_time_recovery_enabled);
            late_init_string(&mut bc.start_time, &o.start_time);
        },
    );
    late_init_i64(&mut params.data_disk_size_gb, settings.data_disk_size_gb);
    late_init_string(&mut params.data_disk_type, &settings.data_disk_type);
    let flags: Vec<DatabaseFlag> = settings
        .database_flags
        .iter()
        .map(|f| DatabaseFlag {
            name: f.name.clone(),
            value: f.value.clone(),
        })
        .collect();
    late_init_vec(&mut params.database_flags, &flags);
    late_init_nested(
        &mut params.ip_configuration,
        settings.ip_configuration.as_ref(),
        |ic: &mut IpConfiguration, o| {
            let networks: Vec<AclEntry> = o
                .authorized_networks
                .iter()
                .map(|n| AclEntry {
                    name: (!n.name.is_empty()).then(|| n.name.clone()),
                    value: (!n.value.is_empty()).then(|| n.value.clone()),
                    expiration_time: (!n.expiration_time.is_empty()).then(|| n.expiration_time.clone()),
                })
                .collect();
            late_init_vec(&mut ic.authorized_networks, &networks);
            late_init_bool(&mut ic.ipv4_enabled, o.ipv4_enabled);
            late_init_string(&mut ic.private_network, &o.private_network);
            late_init_bool(&mut ic.require_ssl, o.require_ssl);
        },
    );
    late_init_nested(
        &mut params.location_preference,
        settings.location_preference.as_ref(),
        |lp: &mut LocationPreference, o| late_init_string(&mut lp.zone, &o.zone),
    );
    late_init_nested(
        &mut params.maintenance_window,
        settings.maintenance_window.as_ref(),
        |mw: &mut MaintenanceWindow, o| {
            late_init_i64(&mut mw.day, o.day);
            late_init_i64(&mut mw.hour, o.hour);
            late_init_string(&mut mw.update_track, &o.update_track);
        },
    );
    late_init_string(&mut params.pricing_plan, &settings.pricing_plan);
    late_init_string(&mut params.replication_type, &settings.replication_type);
    late_init_bool(&mut params.storage_auto_resize, settings.storage_auto_resize);
    late_init_i64(&mut params.storage_auto_resize_limit, settings.storage_auto_resize_limit);
    late_init_map(&mut params.user_labels, &settings.user_labels);
}

/// Whether `observed` matches `params`
pub fn is_cloudsql_up_to_date(
    name: &str,
    params: &CloudSQLInstanceParameters,
    observed: &gcp::DatabaseInstance,
) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_database_instance(name, params, &mut desired);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("CloudSQLInstance"))
}

/// Ready condition for an instance state
pub fn cloudsql_condition(state: &str) -> Condition {
    match state {
        STATE_RUNNABLE => Condition::available(),
        STATE_PENDING_CREATE => Condition::creating(),
        _ => Condition::unavailable(),
    }
}

/// Built-in admin user of the database engine
pub fn default_username(database_version: &str) -> &'static str {
    if database_version.starts_with("POSTGRES") {
        "postgres"
    } else if database_version.starts_with("SQLSERVER") {
        "sqlserver"
    } else {
        "root"
    }
}

/// Connection details published for `instance`
///
/// The public IP is the preferred endpoint; private-only instances publish
/// their private IP instead.
pub fn cloudsql_connection_details(instance: &gcp::DatabaseInstance) -> ConnectionDetails {
    let mut details = ConnectionDetails::new();
    details.insert(
        USERNAME_KEY.to_string(),
        default_username(&instance.database_version).as_bytes().to_vec(),
    );
    let ip_of = |type_: &str| {
        instance
            .ip_addresses
            .iter()
            .find(|ip| ip.type_ == type_)
            .map(|ip| ip.ip_address.clone())
    };
    let public = ip_of(gcp::IP_TYPE_PRIMARY);
    let private = ip_of(gcp::IP_TYPE_PRIVATE);
    if let Some(endpoint) = public.as_ref().or(private.as_ref()) {
        details.insert(ENDPOINT_KEY.to_string(), endpoint.clone().into_bytes());
    }
    if let Some(ip) = public {
        details.insert(PUBLIC_IP_KEY.to_string(), ip.into_bytes());
    }
    if let Some(ip) = private {
        details.insert(PRIVATE_IP_KEY.to_string(), ip.into_bytes());
    }
    if let Some(cert) = instance.server_ca_cert.as_ref().filter(|c| !c.cert.is_empty()) {
        details.insert(SERVER_CA_CERT_KEY.to_string(), cert.cert.clone().into_bytes());
    }
    if !instance.connection_name.is_empty() {
        details.insert(CONNECTION_NAME_KEY.to_string(), instance.connection_name.clone().into_bytes());
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcp_client::common::wire::to_wire;

    fn params() -> CloudSQLInstanceParameters {
        CloudSQLInstanceParameters {
            region: "us-central1".to_string(),
            database_version: Some("POSTGRES_14".to_string()),
            settings: Settings {
                tier: "db-custom-1-3840".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn observed() -> gcp::DatabaseInstance {
        gcp::DatabaseInstance {
            name: "db".to_string(),
            region: "us-central1".to_string(),
            database_version: "POSTGRES_14".to_string(),
            gce_zone: "us-central1-a".to_string(),
            instance_type: "CLOUD_SQL_INSTANCE".to_string(),
            connection_name: "p:us-central1:db".to_string(),
            state: STATE_RUNNABLE.to_string(),
            settings: Some(gcp::Settings {
                tier: "db-custom-1-3840".to_string(),
                activation_policy: "ALWAYS".to_string(),
                data_disk_size_gb: 10,
                storage_auto_resize: true,
                settings_version: 4,
                backup_configuration: Some(gcp::BackupConfiguration {
                    enabled: true,
                    start_time: "03:00".to_string(),
                    ..Default::default()
                }),
                ip_configuration: Some(gcp::IpConfiguration {
                    ipv4_enabled: true,
                    ..Default::default()
                }),
                location_preference: Some(gcp::LocationPreference::default()),
                ..Default::default()
            }),
            ip_addresses: vec![
                gcp::IpMapping {
                    ip_address: "34.1.1.1".to_string(),
                    type_: gcp::IP_TYPE_PRIMARY.to_string(),
                    ..Default::default()
                },
                gcp::IpMapping {
                    ip_address: "10.1.1.1".to_string(),
                    type_: gcp::IP_TYPE_PRIVATE.to_string(),
                    ..Default::default()
                },
            ],
            server_ca_cert: Some(gcp::SslCert {
                cert: "-----BEGIN CERTIFICATE-----".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_late_initialize_then_up_to_date() {
        let observed = observed();
        let mut params = params();
        late_initialize_cloudsql(&mut params, &observed);

        assert_eq!(params.settings.activation_policy.as_deref(), Some("ALWAYS"));
        assert_eq!(params.settings.data_disk_size_gb, Some(10));
        assert_eq!(params.settings.storage_auto_resize, Some(true));
        assert_eq!(
            params.settings.backup_configuration,
            Some(BackupConfiguration {
                enabled: Some(true),
                start_time: Some("03:00".to_string()),
                ..Default::default()
            })
        );
        // an observed struct with nothing set is not adopted
        assert!(params.settings.location_preference.is_none());
        assert!(is_cloudsql_up_to_date("db", &params, &observed).unwrap());

        let once = params.clone();
        late_initialize_cloudsql(&mut params, &observed);
        assert_eq!(params, once);
    }

    #[test]
    fn test_tier_change_is_drift() {
        let mut params = params();
        params.settings.tier = "db-custom-2-7680".to_string();
        assert!(!is_cloudsql_up_to_date("db", &params, &observed()).unwrap());
    }

    #[test]
    fn test_update_carries_settings_version_and_forced_resize() {
        let mut params = params();
        params.settings.storage_auto_resize = Some(false);
        let update = generate_database_instance_update("db", &params, 4);

        let wire = to_wire(&update).unwrap();
        assert_eq!(wire["settings"]["settingsVersion"], 4);
        assert_eq!(wire["settings"]["storageAutoResize"], false);
        assert!(wire.get("rootPassword").is_none());
    }

    #[test]
    fn test_disabled_public_ip_is_sent_and_converges() {
        let mut params = params();
        params.settings.ip_configuration = Some(IpConfiguration {
            ipv4_enabled: Some(false),
            private_network: Some("projects/p/global/networks/vpc".to_string()),
            require_ssl: Some(false),
            ..Default::default()
        });
        params.settings.backup_configuration = Some(BackupConfiguration {
            enabled: Some(false),
            ..Default::default()
        });

        let mut instance = gcp::DatabaseInstance::default();
        generate_database_instance("db", &params, &mut instance);
        let create = to_wire(&instance).unwrap();
        assert_eq!(create["settings"]["ipConfiguration"]["ipv4Enabled"], false);
        assert_eq!(create["settings"]["ipConfiguration"]["requireSsl"], false);
        assert_eq!(create["settings"]["backupConfiguration"]["enabled"], false);

        let patch = to_wire(&generate_database_instance_update("db", &params, 4)).unwrap();
        assert_eq!(patch["settings"]["ipConfiguration"]["ipv4Enabled"], false);
        assert_eq!(patch["settings"]["backupConfiguration"]["enabled"], false);

        // the server default still has public IP on
        let server_default = observed();
        late_initialize_cloudsql(&mut params, &server_default);
        assert_eq!(params.settings.ip_configuration.as_ref().unwrap().ipv4_enabled, Some(false));
        assert!(!is_cloudsql_up_to_date("db", &params, &server_default).unwrap());

        let mut applied = observed();
        let settings = applied.settings.as_mut().unwrap();
        settings.ip_configuration = Some(gcp::IpConfiguration {
            private_network: "projects/p/global/networks/vpc".to_string(),
            ..Default::default()
        });
        settings.backup_configuration = Some(gcp::BackupConfiguration {
            start_time: "03:00".to_string(),
            ..Default::default()
        });
        late_initialize_cloudsql(&mut params, &applied);
        assert!(is_cloudsql_up_to_date("db", &params, &applied).unwrap());
    }

    #[test]
    fn test_conditions_follow_state() {
        assert!(cloudsql_condition("RUNNABLE").equal(&Condition::available()));
        assert!(cloudsql_condition("PENDING_CREATE").equal(&Condition::creating()));
        assert!(cloudsql_condition("MAINTENANCE").equal(&Condition::unavailable()));
        assert!(cloudsql_condition("SUSPENDED").equal(&Condition::unavailable()));
    }

    #[test]
    fn test_connection_details_prefer_public_ip() {
        let details = cloudsql_connection_details(&observed());
        assert_eq!(details[ENDPOINT_KEY], b"34.1.1.1");
        assert_eq!(details[PUBLIC_IP_KEY], b"34.1.1.1");
        assert_eq!(details[PRIVATE_IP_KEY], b"10.1.1.1");
        assert_eq!(details[USERNAME_KEY], b"postgres");
        assert_eq!(details[CONNECTION_NAME_KEY], b"p:us-central1:db");
        assert!(details.contains_key(SERVER_CA_CERT_KEY));
        assert!(!details.contains_key(PASSWORD_KEY));
    }

    #[test]
    fn test_private_only_instance_uses_private_endpoint() {
        let mut instance = observed();
        instance.ip_addresses.retain(|ip| ip.type_ == gcp::IP_TYPE_PRIVATE);
        instance.database_version = "MYSQL_8_0".to_string();
        let details = cloudsql_connection_details(&instance);
        assert_eq!(details[ENDPOINT_KEY], b"10.1.1.1");
        assert_eq!(details[USERNAME_KEY], b"root");
        assert!(!details.contains_key(PUBLIC_IP_KEY));
    }

    #[test]
    fn test_default_username() {
        assert_eq!(default_username("SQLSERVER_2019_STANDARD"), "sqlserver");
        assert_eq!(default_username("MYSQL_5_7"), "root");
    }
}
