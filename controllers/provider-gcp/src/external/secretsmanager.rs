//! Secret Manager external clients
//!
//! Handles: Secret, SecretVersion
//!
//! A SecretVersion has no name of its own until it is added; its external
//! name is the version number Secret Manager assigns.

use crate::clients::last_segment;
use crate::clients::secretsmanager::secret::{
    generate_secret, generate_secret_observation, generate_secret_update, is_secret_up_to_date, late_initialize_secret,
    secret_name,
};
use crate::clients::secretsmanager::secret_version::{
    PAYLOAD_KEY, StateChange, generate_secret_version_observation, is_secret_version_up_to_date,
    late_initialize_secret_version, secret_version_name, state_change,
};
use crate::error::ControllerError;
use crate::external::{deleted, external_name, found, required};
use crate::managed::{
    ConnectionDetails, Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup,
    late_initialize,
};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{Condition, Managed, Secret, SecretVersion};
use gcp_client::models::secretmanager as gcp;
use tracing::{debug, info};

struct SecretExternal {
    conn: Connection,
}

impl Setup for Secret {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(SecretExternal { conn })
    }
}

impl SecretExternal {
    fn name(&self, mr: &Secret) -> Result<String, ControllerError> {
        Ok(secret_name(&self.conn.project, &external_name(mr)?))
    }

    async fn get(&self, name: &str) -> Result<Option<gcp::Secret>, ControllerError> {
        found(self.conn.secretmanager.get_secret(name).await, "cannot get Secret")
    }
}

#[async_trait]
impl ExternalClient<Secret> for SecretExternal {
    async fn observe(&self, mr: &mut Secret) -> Result<ExternalObservation, ControllerError> {
        let name = self.name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_secret(p, &observed));
        mr.set_at_provider(generate_secret_observation(&observed));
        mr.set_conditions([Condition::available()]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_secret_up_to_date(mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut Secret) -> Result<ExternalCreation, ControllerError> {
        let secret_id = external_name(mr)?;
        let mut secret = gcp::Secret::default();
        generate_secret(mr.for_provider(), &mut secret);
        let parent = format!("projects/{}", self.conn.project);
        self.conn
            .secretmanager
            .create_secret(&parent, &secret_id, &secret)
            .await
            .map_err(ControllerError::gcp("cannot create Secret"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut Secret) -> Result<ExternalUpdate, ControllerError> {
        let name = self.name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalUpdate::default());
        };
        let (secret, mask) = generate_secret_update(mr.for_provider(), &observed)?;
        if mask.is_empty() {
            return Ok(ExternalUpdate::default());
        }
        self.conn
            .secretmanager
            .patch_secret(&name, &secret, &mask)
            .await
            .map_err(ControllerError::gcp("cannot update Secret"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut Secret) -> Result<Deletion, ControllerError> {
        let name = self.name(mr)?;
        deleted(self.conn.secretmanager.delete_secret(&name).await, "cannot delete Secret")?;
        Ok(Deletion::Complete)
    }
}

struct SecretVersionExternal {
    conn: Connection,
}

impl Setup for SecretVersion {
    const NAME_AS_EXTERNAL_NAME: bool = false;

    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(SecretVersionExternal { conn })
    }
}

impl SecretVersionExternal {
    /// Full name of the secret the version belongs to
    fn parent(&self, mr: &SecretVersion) -> Result<String, ControllerError> {
        let secret = required(mr, mr.spec.for_provider.secret.as_ref(), "spec.forProvider.secret")?;
        if secret.starts_with("projects/") {
            Ok(secret.to_string())
        } else {
            Ok(secret_name(&self.conn.project, secret))
        }
    }

    fn name(&self, mr: &SecretVersion) -> Result<String, ControllerError> {
        Ok(secret_version_name(&self.parent(mr)?, &external_name(mr)?))
    }
}

#[async_trait]
impl ExternalClient<SecretVersion> for SecretVersionExternal {
    async fn observe(&self, mr: &mut SecretVersion) -> Result<ExternalObservation, ControllerError> {
        if mr.external_name().is_none() {
            return Ok(ExternalObservation::absent());
        }
        let name = self.name(mr)?;
        let Some(observed) = found(
            self.conn.secretmanager.get_secret_version(&name).await,
            "cannot get SecretVersion",
        )?
        else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_secret_version(p, &observed));
        mr.set_at_provider(generate_secret_version_observation(&observed));
        mr.set_conditions([Condition::available()]);

        let mut connection_details = ConnectionDetails::new();
        if observed.state == gcp::VERSION_STATE_ENABLED {
            match self.conn.secretmanager.access_secret_version(&name).await {
                Ok(payload) => {
                    connection_details.insert(PAYLOAD_KEY.to_string(), payload);
                }
                // Disabled between the get and the access
                Err(e) if e.is_failed_precondition() => debug!("SecretVersion {} payload not accessible: {}", name, e),
                Err(e) => return Err(ControllerError::gcp("cannot access SecretVersion")(e)),
            }
        }

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_secret_version_up_to_date(mr.for_provider(), &observed),
            resource_late_initialized: late_initialized,
            connection_details,
        })
    }

    async fn create(&self, mr: &mut SecretVersion) -> Result<ExternalCreation, ControllerError> {
        let parent = self.parent(mr)?;
        let data = self
            .conn
            .secrets
            .read_key(&mr.spec.for_provider.payload.secret_key_ref)
            .await?;
        let version = self
            .conn
            .secretmanager
            .add_secret_version(&parent, &data)
            .await
            .map_err(ControllerError::gcp("cannot create SecretVersion"))?;
        info!("Added {}", version.name);
        mr.set_external_name(last_segment(&version.name));
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut SecretVersion) -> Result<ExternalUpdate, ControllerError> {
        let name = self.name(mr)?;
        let observed = mr.at_provider().map(|o| o.state.clone()).unwrap_or_default();
        let desired = mr.spec.for_provider.desired_secret_version_state.unwrap_or_default();
        let api = &self.conn.secretmanager;
        let result = match state_change(desired, &observed)? {
            None => return Ok(ExternalUpdate::default()),
            Some(StateChange::Enable) => api.enable_secret_version(&name).await,
            Some(StateChange::Disable) => api.disable_secret_version(&name).await,
            Some(StateChange::Destroy) => api.destroy_secret_version(&name).await,
        };
        result.map_err(ControllerError::gcp("cannot update SecretVersion"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut SecretVersion) -> Result<Deletion, ControllerError> {
        let name = self.name(mr)?;
        match self.conn.secretmanager.destroy_secret_version(&name).await {
            // Already destroyed
            Err(e) if e.is_failed_precondition() => {}
            result => deleted(result, "cannot delete SecretVersion")?,
        }
        Ok(Deletion::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managed::{finalize_external, sync_external};
    use crate::test_utils::{MemorySecretStore, mock_connection, mock_connection_with_secrets, named};
    use crds::{
        SecretKeySelector, SecretParameters, SecretSpec, SecretVersionParameters, SecretVersionPayload,
        SecretVersionSpec, SecretVersionState,
    };
    use gcp_client::MockGcpClient;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const SECRET: &str = "projects/test-project/secrets/db-pass";

    fn secret(params: SecretParameters) -> Secret {
        named(Secret::new(
            "db-pass",
            SecretSpec {
                resource_spec: Default::default(),
                for_provider: params,
            },
        ))
    }

    fn version(state: Option<SecretVersionState>) -> SecretVersion {
        SecretVersion::new(
            "db-pass-v1",
            SecretVersionSpec {
                resource_spec: Default::default(),
                for_provider: SecretVersionParameters {
                    secret: Some("db-pass".to_string()),
                    payload: SecretVersionPayload {
                        secret_key_ref: SecretKeySelector {
                            name: "db-pass-source".to_string(),
                            namespace: "default".to_string(),
                            key: "password".to_string(),
                        },
                    },
                    desired_secret_version_state: state,
                    ..Default::default()
                },
            },
        )
    }

    async fn secret_with_source(mock: &Arc<MockGcpClient>) -> Connection {
        let store = MemorySecretStore::default();
        store.insert("default", "db-pass-source", "password", b"hunter2");
        let conn = mock_connection_with_secrets(mock, store);
        let client = Secret::external(conn.clone());
        sync_external(client.as_ref(), &mut secret(SecretParameters::default()))
            .await
            .unwrap();
        conn
    }

    #[tokio::test]
    async fn test_secret_defaults_to_automatic_replication() {
        let mock = Arc::new(MockGcpClient::new());
        let client = Secret::external(mock_connection(&mock));
        let mut mr = secret(SecretParameters::default());

        sync_external(client.as_ref(), &mut mr).await.unwrap();
        let stored = mock.secret(SECRET).unwrap();
        assert!(stored.replication.unwrap().automatic.is_some());

        let observation = client.observe(&mut mr).await.unwrap();
        assert!(observation.resource_up_to_date);
        assert!(mr.is_ready());
    }

    #[tokio::test]
    async fn test_secret_labels_are_patched() {
        let mock = Arc::new(MockGcpClient::new());
        let client = Secret::external(mock_connection(&mock));
        let mut mr = secret(SecretParameters::default());
        client.create(&mut mr).await.unwrap();

        mr.spec.for_provider.labels = Some(BTreeMap::from([("owner".to_string(), "db".to_string())]));
        assert!(!client.observe(&mut mr).await.unwrap().resource_up_to_date);
        client.update(&mut mr).await.unwrap();

        assert_eq!(mock.secret(SECRET).unwrap().labels["owner"], "db");
        assert!(client.observe(&mut mr).await.unwrap().resource_up_to_date);
    }

    #[tokio::test]
    async fn test_version_is_added_from_kubernetes_secret() {
        let mock = Arc::new(MockGcpClient::new());
        let client = SecretVersion::external(secret_with_source(&mock).await);
        let mut mr = version(None);

        let outcome = sync_external(client.as_ref(), &mut mr).await.unwrap();
        assert!(outcome.spec_changed);
        assert_eq!(mr.external_name(), Some("1"));

        let observation = client.observe(&mut mr).await.unwrap();
        assert!(observation.resource_up_to_date);
        assert_eq!(observation.connection_details[PAYLOAD_KEY], b"hunter2".to_vec());
        assert_eq!(
            mr.spec.for_provider.desired_secret_version_state,
            Some(SecretVersionState::Enabled)
        );
        assert_eq!(mr.at_provider().unwrap().name, format!("{SECRET}/versions/1"));
    }

    #[tokio::test]
    async fn test_disabled_version_hides_payload() {
        let mock = Arc::new(MockGcpClient::new());
        let client = SecretVersion::external(secret_with_source(&mock).await);
        let mut mr = version(Some(SecretVersionState::Disabled));
        client.create(&mut mr).await.unwrap();

        assert!(!client.observe(&mut mr).await.unwrap().resource_up_to_date);
        client.update(&mut mr).await.unwrap();
        let stored = mock.secret_version(&format!("{SECRET}/versions/1")).unwrap();
        assert_eq!(stored.state, gcp::VERSION_STATE_DISABLED);

        let observation = client.observe(&mut mr).await.unwrap();
        assert!(observation.resource_up_to_date);
        assert!(observation.connection_details.is_empty());
    }

    #[tokio::test]
    async fn test_destroyed_version_cannot_be_enabled() {
        let mock = Arc::new(MockGcpClient::new());
        let client = SecretVersion::external(secret_with_source(&mock).await);
        let mut mr = version(Some(SecretVersionState::Destroyed));
        client.create(&mut mr).await.unwrap();
        client.observe(&mut mr).await.unwrap();
        client.update(&mut mr).await.unwrap();
        client.observe(&mut mr).await.unwrap();

        mr.spec.for_provider.desired_secret_version_state = Some(SecretVersionState::Enabled);
        let err = client.update(&mut mr).await.unwrap_err();
        assert!(matches!(err, ControllerError::InvalidSpec(_)));
        assert!(!mock.called("enable_secret_version"));
    }

    #[tokio::test]
    async fn test_delete_destroys_version() {
        let mock = Arc::new(MockGcpClient::new());
        let client = SecretVersion::external(secret_with_source(&mock).await);
        let mut mr = version(None);
        client.create(&mut mr).await.unwrap();

        assert!(finalize_external(client.as_ref(), &mut mr).await.unwrap());
        let stored = mock.secret_version(&format!("{SECRET}/versions/1")).unwrap();
        assert_eq!(stored.state, gcp::VERSION_STATE_DESTROYED);
        assert_eq!(client.delete(&mut mr).await.unwrap(), Deletion::Complete);
    }

    #[tokio::test]
    async fn test_version_without_external_name_is_absent() {
        let mock = Arc::new(MockGcpClient::new());
        let client = SecretVersion::external(mock_connection(&mock));
        let mut mr = version(None);

        assert!(!client.observe(&mut mr).await.unwrap().resource_exists);
        assert!(mock.calls().is_empty());
    }
}
