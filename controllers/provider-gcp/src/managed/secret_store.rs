//! Kubernetes Secret access
//!
//! Credentials and SecretVersion payloads are read from Secret keys, and
//! connection details are written to the Secret named by
//! `writeConnectionSecretToRef`.

use crate::error::ControllerError;
use crate::managed::ConnectionDetails;
use async_trait::async_trait;
use crds::{SecretKeySelector, SecretReference};
use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::{DeleteParams, ObjectMeta, Patch, PatchParams, PostParams};
use kube::{Api, Client};
use tracing::{debug, info};

/// Field manager of connection secret writes
pub const FIELD_MANAGER: &str = "provider-gcp";

/// Type of connection secrets
pub const CONNECTION_SECRET_TYPE: &str = "connection.crossplane.io/v1alpha1";

/// Read and write access to Kubernetes Secrets
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Value of one Secret key
    async fn read_key(&self, selector: &SecretKeySelector) -> Result<Vec<u8>, ControllerError>;

    /// Write `details` to the Secret `to`, owned by `owner`
    ///
    /// Keys already in the Secret and absent from `details` are kept, so a
    /// password only known at creation survives later publishes.
    async fn publish(
        &self,
        owner: Option<OwnerReference>,
        to: &SecretReference,
        details: &ConnectionDetails,
    ) -> Result<(), ControllerError>;

    /// Delete the Secret `to`; a missing Secret is fine
    async fn unpublish(&self, to: &SecretReference) -> Result<(), ControllerError>;
}

/// `SecretStore` over the Kubernetes API
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl std::fmt::Debug for KubeSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretStore").finish_non_exhaustive()
    }
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Connection secret carrying `details`
pub fn connection_secret(owner: Option<OwnerReference>, to: &SecretReference, details: &ConnectionDetails) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(to.name.clone()),
            namespace: Some(to.namespace.clone()),
            owner_references: owner.map(|o| vec![o]),
            ..Default::default()
        },
        type_: Some(CONNECTION_SECRET_TYPE.to_string()),
        data: Some(
            details
                .iter()
                .map(|(k, v)| (k.clone(), ByteString(v.clone())))
                .collect(),
        ),
        ..Default::default()
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn read_key(&self, selector: &SecretKeySelector) -> Result<Vec<u8>, ControllerError> {
        let secret = self
            .api(&selector.namespace)
            .get_opt(&selector.name)
            .await?
            .ok_or_else(|| {
                ControllerError::InvalidSpec(format!("secret {}/{} not found", selector.namespace, selector.name))
            })?;
        secret
            .data
            .and_then(|mut data| data.remove(&selector.key))
            .map(|value| value.0)
            .ok_or_else(|| {
                ControllerError::InvalidSpec(format!(
                    "secret {}/{} has no key {}",
                    selector.namespace, selector.name, selector.key
                ))
            })
    }

    async fn publish(
        &self,
        owner: Option<OwnerReference>,
        to: &SecretReference,
        details: &ConnectionDetails,
    ) -> Result<(), ControllerError> {
        let api = self.api(&to.namespace);
        let secret = connection_secret(owner, to, details);
        if api.get_opt(&to.name).await?.is_some() {
            api.patch(&to.name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&secret))
                .await?;
        } else {
            api.create(&PostParams::default(), &secret).await?;
        }
        debug!("Published {} connection details to {}/{}", details.len(), to.namespace, to.name);
        Ok(())
    }

    async fn unpublish(&self, to: &SecretReference) -> Result<(), ControllerError> {
        match self.api(&to.namespace).delete(&to.name, &DeleteParams::default()).await {
            Ok(_) => {
                info!("Deleted connection secret {}/{}", to.namespace, to.name);
                Ok(())
            }
            Err(kube::Error::Api(e)) if e.code == 404 => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_secret_shape() {
        let details = ConnectionDetails::from([("password".to_string(), b"s3cret".to_vec())]);
        let to = SecretReference {
            name: "db-conn".to_string(),
            namespace: "apps".to_string(),
        };
        let owner = OwnerReference {
            api_version: "database.gcp.crossplane.io/v1beta1".to_string(),
            kind: "CloudSQLInstance".to_string(),
            name: "db".to_string(),
            uid: "1234".to_string(),
            controller: Some(true),
            ..Default::default()
        };

        let secret = connection_secret(Some(owner), &to, &details);
        assert_eq!(secret.type_.as_deref(), Some(CONNECTION_SECRET_TYPE));
        assert_eq!(secret.metadata.namespace.as_deref(), Some("apps"));
        assert_eq!(secret.metadata.owner_references.unwrap()[0].kind, "CloudSQLInstance");
        assert_eq!(secret.data.unwrap()["password"].0, b"s3cret".to_vec());
    }
}
