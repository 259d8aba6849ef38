//! Cloud SQL operations for MockGcpClient

use super::{MockGcpClient, done, get_or_not_found, insert_new, lock, merge, remove_or_not_found};
use crate::error::GcpError;
use crate::gcp_trait::SqlAdminApi;
use crate::models::*;

#[async_trait::async_trait]
impl SqlAdminApi for MockGcpClient {
    async fn get_instance(&self, project: &str, name: &str) -> Result<DatabaseInstance, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("get_instance", &key)?;
        get_or_not_found(&self.instances, &key, "instance")
    }

    async fn insert_instance(&self, project: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError> {
        let key = format!("{project}/{}", instance.name);
        self.begin("insert_instance", &key)?;
        let id = self.next_id();
        let self_link = format!(
            "https://sqladmin.googleapis.com/sql/v1beta4/projects/{project}/instances/{}",
            instance.name
        );

        let mut stored = instance.clone();
        stored.project = project.to_string();
        stored.self_link = self_link.clone();
        stored.state = "RUNNABLE".to_string();
        stored.backend_type = "SECOND_GEN".to_string();
        stored.connection_name = format!("{project}:{}:{}", instance.region, instance.name);
        stored.service_account_email_address = format!("p{id}@gcp-sa-cloud-sql.iam.gserviceaccount.com");
        stored.ip_addresses = vec![IpMapping {
            ip_address: format!("198.51.100.{}", id % 256),
            type_: IP_TYPE_PRIMARY.to_string(),
            time_to_retire: String::new(),
        }];
        stored.server_ca_cert = Some(SslCert {
            cert: "-----BEGIN CERTIFICATE-----\nMOCK\n-----END CERTIFICATE-----".to_string(),
            common_name: format!("C=US,O=Google\\, Inc,CN=Google Cloud SQL Server CA,dnQualifier={id}"),
            ..Default::default()
        });
        // Passwords are write-only.
        stored.root_password.clear();
        if let Some(settings) = stored.settings.as_mut() {
            settings.settings_version = 1;
            settings.force_send_fields.clear();
        }

        insert_new(&self.instances, &key, "instance", stored)?;
        Ok(done("CREATE", &self_link, id))
    }

    async fn patch_instance(&self, project: &str, name: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("patch_instance", &key)?;
        let existing = get_or_not_found(&self.instances, &key, "instance")?;

        let current_version = existing.settings.as_ref().map_or(0, |s| s.settings_version);
        let requested_version = instance.settings.as_ref().map_or(0, |s| s.settings_version);
        if requested_version != 0 && requested_version != current_version {
            return Err(GcpError::Conflict(format!(
                "settings version {requested_version} of instance {key} is stale"
            )));
        }

        let mut patched = merge(&existing, instance)?;
        if let Some(settings) = patched.settings.as_mut() {
            settings.settings_version = current_version + 1;
        }
        lock(&self.instances).insert(key, patched);
        Ok(done("UPDATE", &existing.self_link, self.next_id()))
    }

    async fn delete_instance(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("delete_instance", &key)?;
        let removed = remove_or_not_found(&self.instances, &key, "instance")?;
        Ok(done("DELETE", &removed.self_link, self.next_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_patch_bumps_settings_version() {
        let mock = MockGcpClient::new();
        let instance = DatabaseInstance {
            name: "db".to_string(),
            region: "us-central1".to_string(),
            settings: Some(Settings {
                tier: "db-n1-standard-1".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        mock.insert_instance("p", &instance).await.unwrap();
        let stored = mock.get_instance("p", "db").await.unwrap();
        assert_eq!(stored.connection_name, "p:us-central1:db");
        assert_eq!(stored.settings.as_ref().unwrap().settings_version, 1);

        let patch = DatabaseInstance {
            settings: Some(Settings {
                tier: "db-n1-standard-2".to_string(),
                settings_version: 1,
                ..Default::default()
            }),
            ..Default::default()
        };
        mock.patch_instance("p", "db", &patch).await.unwrap();
        let settings = mock.instance("p", "db").unwrap().settings.unwrap();
        assert_eq!(settings.tier, "db-n1-standard-2");
        assert_eq!(settings.settings_version, 2);

        assert!(matches!(
            mock.patch_instance("p", "db", &patch).await,
            Err(GcpError::Conflict(_))
        ));
    }
}
