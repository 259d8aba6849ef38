//! Secret Manager operations for MockGcpClient

use super::{MockGcpClient, get_or_not_found, insert_new, lock, merge, now, remove_or_not_found};
use crate::error::GcpError;
use crate::gcp_trait::SecretManagerApi;
use crate::models::*;

impl MockGcpClient {
    fn set_version_state(&self, name: &str, state: &str) -> Result<SecretVersion, GcpError> {
        let mut versions = lock(&self.secret_versions);
        let version = versions
            .get_mut(name)
            .ok_or_else(|| GcpError::NotFound(format!("secret version {name} not found")))?;
        if version.state == VERSION_STATE_DESTROYED {
            return Err(GcpError::FailedPrecondition(format!(
                "secret version {name} is in DESTROYED state"
            )));
        }
        version.state = state.to_string();
        if state == VERSION_STATE_DESTROYED {
            version.destroy_time = now();
            lock(&self.payloads).remove(name);
        }
        Ok(version.clone())
    }
}

#[async_trait::async_trait]
impl SecretManagerApi for MockGcpClient {
    async fn get_secret(&self, name: &str) -> Result<Secret, GcpError> {
        self.begin("get_secret", name)?;
        get_or_not_found(&self.secrets, name, "secret")
    }

    async fn create_secret(&self, parent: &str, secret_id: &str, secret: &Secret) -> Result<Secret, GcpError> {
        let name = format!("{parent}/secrets/{secret_id}");
        self.begin("create_secret", &name)?;
        if secret.replication.is_none() {
            return Err(GcpError::InvalidRequest("replication is required".to_string()));
        }
        let mut stored = secret.clone();
        stored.name = name.clone();
        stored.create_time = now();
        if let Some(replication) = stored.replication.as_mut() {
            replication.force_send_fields.clear();
        }
        insert_new(&self.secrets, &name, "secret", stored)
    }

    async fn patch_secret(&self, name: &str, secret: &Secret, update_mask: &[String]) -> Result<Secret, GcpError> {
        self.begin("patch_secret", name)?;
        let existing = get_or_not_found(&self.secrets, name, "secret")?;
        let mut patched = merge(&existing, secret)?;
        if update_mask.iter().any(|f| f == "labels") {
            patched.labels = secret.labels.clone();
        }
        lock(&self.secrets).insert(name.to_string(), patched.clone());
        Ok(patched)
    }

    async fn delete_secret(&self, name: &str) -> Result<(), GcpError> {
        self.begin("delete_secret", name)?;
        remove_or_not_found(&self.secrets, name, "secret")?;
        let prefix = format!("{name}/versions/");
        lock(&self.secret_versions).retain(|k, _| !k.starts_with(&prefix));
        lock(&self.payloads).retain(|k, _| !k.starts_with(&prefix));
        Ok(())
    }

    async fn get_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError> {
        self.begin("get_secret_version", name)?;
        get_or_not_found(&self.secret_versions, name, "secret version")
    }

    async fn add_secret_version(&self, parent: &str, data: &[u8]) -> Result<SecretVersion, GcpError> {
        self.begin("add_secret_version", parent)?;
        if !lock(&self.secrets).contains_key(parent) {
            return Err(GcpError::NotFound(format!("secret {parent} not found")));
        }
        let prefix = format!("{parent}/versions/");
        let number = lock(&self.secret_versions)
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .count()
            + 1;
        let version = SecretVersion {
            name: format!("{prefix}{number}"),
            create_time: now(),
            destroy_time: String::new(),
            state: VERSION_STATE_ENABLED.to_string(),
        };
        lock(&self.payloads).insert(version.name.clone(), data.to_vec());
        insert_new(&self.secret_versions, &version.name, "secret version", version.clone())
    }

    async fn access_secret_version(&self, name: &str) -> Result<Vec<u8>, GcpError> {
        self.begin("access_secret_version", name)?;
        let version = get_or_not_found(&self.secret_versions, name, "secret version")?;
        if version.state != VERSION_STATE_ENABLED {
            return Err(GcpError::FailedPrecondition(format!(
                "secret version {name} is in {} state",
                version.state
            )));
        }
        Ok(lock(&self.payloads).get(name).cloned().unwrap_or_default())
    }

    async fn enable_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError> {
        self.begin("enable_secret_version", name)?;
        self.set_version_state(name, VERSION_STATE_ENABLED)
    }

    async fn disable_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError> {
        self.begin("disable_secret_version", name)?;
        self.set_version_state(name, VERSION_STATE_DISABLED)
    }

    async fn destroy_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError> {
        self.begin("destroy_secret_version", name)?;
        self.set_version_state(name, VERSION_STATE_DESTROYED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_version_states() {
        let mock = MockGcpClient::new();
        let secret = Secret {
            replication: Some(Replication {
                automatic: Some(AutomaticReplication {}),
                ..Default::default()
            }),
            ..Default::default()
        };
        let created = mock.create_secret("projects/p", "db-pass", &secret).await.unwrap();
        let version = SecretManagerApi::add_secret_version(&mock, &created.name, b"hunter2").await.unwrap();
        assert_eq!(version.name, "projects/p/secrets/db-pass/versions/1");
        assert_eq!(mock.access_secret_version(&version.name).await.unwrap(), b"hunter2");

        mock.disable_secret_version(&version.name).await.unwrap();
        assert!(mock.access_secret_version(&version.name).await.unwrap_err().is_failed_precondition());

        mock.destroy_secret_version(&version.name).await.unwrap();
        assert!(mock.enable_secret_version(&version.name).await.unwrap_err().is_failed_precondition());
        assert!(!mock.secret_version(&version.name).unwrap().destroy_time.is_empty());
    }
}
