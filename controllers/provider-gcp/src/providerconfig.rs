//! ProviderConfig connector
//!
//! Turns the ProviderConfig a managed resource names into a [`Connection`]:
//! the project plus one client per Google API. A connection is reused while
//! the ProviderConfig `resourceVersion` and the service account key it points
//! at are unchanged, so that token caching survives across reconciles and a
//! rotated key takes effect on the next reconcile.

use crate::error::ControllerError;
use crate::managed::secret_store::SecretStore;
use crate::reference::ObjectReader;
use crds::{CredentialsSource, Managed, ProviderConfig, SecretKeySelector};
use gcp_client::{
    ComputeApi, Endpoints, GcpClient, GcpCredentials, IamApi, KmsApi, PubSubApi, SecretManagerApi, SqlAdminApi,
    TokenSource,
};
use kube::core::ApiResource;
use kube::{Resource, ResourceExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Clients for one GCP project
#[derive(Clone)]
pub struct Connection {
    /// Project every resource of this connection lives in
    pub project: String,
    pub compute: Arc<dyn ComputeApi>,
    pub sqladmin: Arc<dyn SqlAdminApi>,
    pub kms: Arc<dyn KmsApi>,
    pub iam: Arc<dyn IamApi>,
    pub pubsub: Arc<dyn PubSubApi>,
    pub secretmanager: Arc<dyn SecretManagerApi>,
    /// Kubernetes Secrets, for payloads referenced from specs
    pub secrets: Arc<dyn SecretStore>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Connection whose every service is served by `client`
    pub fn from_client<C>(project: impl Into<String>, client: Arc<C>, secrets: Arc<dyn SecretStore>) -> Self
    where
        C: ComputeApi + SqlAdminApi + KmsApi + IamApi + PubSubApi + SecretManagerApi + 'static,
    {
        Self {
            project: project.into(),
            compute: client.clone(),
            sqladmin: client.clone(),
            kms: client.clone(),
            iam: client.clone(),
            pubsub: client.clone(),
            secretmanager: client,
            secrets,
        }
    }
}

/// What a cached connection was built from
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConnectionKey {
    /// ProviderConfig `resourceVersion`
    version: String,
    /// Service account key; `None` for injected identity
    credentials: Option<Vec<u8>>,
}

/// Builds connections from ProviderConfigs
pub struct Connector {
    reader: Arc<dyn ObjectReader>,
    secrets: Arc<dyn SecretStore>,
    api_root: Option<String>,
    cache: RwLock<HashMap<String, (ConnectionKey, Connection)>>,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

impl Connector {
    /// Create a connector; `api_root` overrides the Google API root
    pub fn new(reader: Arc<dyn ObjectReader>, secrets: Arc<dyn SecretStore>, api_root: Option<String>) -> Self {
        Self {
            reader,
            secrets,
            api_root,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Connection for the ProviderConfig `mr` names
    pub async fn connect<K: Managed>(&self, mr: &K) -> Result<Connection, ControllerError> {
        let config_name = mr.resource_spec().provider_config_name().to_string();
        let config = match self.provider_config(&config_name).await {
            Ok(config) => config,
            Err(e) => {
                if self.cache.write().await.remove(&config_name).is_some() {
                    debug!("Dropped cached connection of ProviderConfig {}", config_name);
                }
                return Err(e);
            }
        };
        let key = ConnectionKey {
            version: config.resource_version().unwrap_or_default(),
            credentials: self.credentials(&config).await?,
        };

        if let Some((cached_key, connection)) = self.cache.read().await.get(&config_name) {
            if *cached_key == key {
                return Ok(connection.clone());
            }
        }

        let tokens = token_source(key.credentials.as_deref()).await?;
        let client = match &self.api_root {
            Some(root) => GcpClient::with_endpoints(tokens, Endpoints::with_root(root)),
            None => GcpClient::new(tokens),
        }
        .map_err(|e| ControllerError::Connect(format!("cannot create GCP client: {e}")))?;

        let connection = Connection::from_client(config.spec.project_id.clone(), Arc::new(client), self.secrets.clone());
        info!(
            "Connected ProviderConfig {} (project {})",
            config_name, connection.project
        );
        self.cache
            .write()
            .await
            .insert(config_name, (key, connection.clone()));
        Ok(connection)
    }

    async fn provider_config(&self, name: &str) -> Result<ProviderConfig, ControllerError> {
        let resource = ApiResource::erase::<ProviderConfig>(&());
        let object = self
            .reader
            .get(&resource, name)
            .await?
            .ok_or_else(|| ControllerError::Connect(format!("ProviderConfig {name} not found")))?;
        let config: ProviderConfig = serde_json::from_value(serde_json::to_value(object)?)?;
        if config.spec.project_id.is_empty() {
            return Err(ControllerError::Connect(format!("ProviderConfig {name} has no projectID")));
        }
        Ok(config)
    }

    /// Service account key of a `Secret` source config
    async fn credentials(&self, config: &ProviderConfig) -> Result<Option<Vec<u8>>, ControllerError> {
        match config.spec.credentials.source {
            CredentialsSource::Secret => {
                let selector = credentials_secret(config)?;
                let key = self.secrets.read_key(selector).await?;
                debug!("Read service account key from {}/{}", selector.namespace, selector.name);
                Ok(Some(key))
            }
            CredentialsSource::InjectedIdentity => Ok(None),
        }
    }
}

/// Token source for a service account key, or the injected identity
async fn token_source(credentials: Option<&[u8]>) -> Result<Arc<dyn TokenSource>, ControllerError> {
    let credentials = match credentials {
        Some(key) => {
            let json = std::str::from_utf8(key)
                .map_err(|e| ControllerError::Connect(format!("credentials are not UTF-8: {e}")))?;
            GcpCredentials::from_service_account_json(json).map_err(|e| ControllerError::Connect(e.to_string()))?
        }
        None => GcpCredentials::application_default()
            .await
            .map_err(|e| ControllerError::Connect(e.to_string()))?,
    };
    Ok(Arc::new(credentials))
}

/// Secret key holding the service account key of a `Secret` source config
fn credentials_secret(config: &ProviderConfig) -> Result<&SecretKeySelector, ControllerError> {
    config.spec.credentials.secret_ref.as_ref().ok_or_else(|| {
        ControllerError::Connect(format!(
            "ProviderConfig {} uses source Secret without secretRef",
            config.name_any()
        ))
    })
}
