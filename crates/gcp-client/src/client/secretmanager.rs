//! Secret Manager v1

use super::{GcpClient, body, mask};
use crate::common::with_query;
use crate::error::GcpError;
use crate::gcp_trait::SecretManagerApi;
use crate::models::*;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

impl GcpClient {
    fn secretmanager_url(&self, name: &str) -> String {
        format!("{}/{}", self.endpoints.secretmanager, name)
    }

    async fn version_action(&self, name: &str, action: &str) -> Result<SecretVersion, GcpError> {
        self.http
            .post(&self.secretmanager_url(&format!("{name}:{action}")), &json!({}))
            .await
    }
}

#[async_trait::async_trait]
impl SecretManagerApi for GcpClient {
    async fn get_secret(&self, name: &str) -> Result<Secret, GcpError> {
        self.http.get(&self.secretmanager_url(name)).await
    }

    async fn create_secret(&self, parent: &str, secret_id: &str, secret: &Secret) -> Result<Secret, GcpError> {
        let url = with_query(
            &self.secretmanager_url(&format!("{parent}/secrets")),
            &[("secretId", secret_id)],
        );
        self.http.post(&url, &body(secret)?).await
    }

    async fn patch_secret(&self, name: &str, secret: &Secret, update_mask: &[String]) -> Result<Secret, GcpError> {
        let url = with_query(&self.secretmanager_url(name), &[("updateMask", mask(update_mask).as_str())]);
        self.http.patch(&url, &body(secret)?).await
    }

    async fn delete_secret(&self, name: &str) -> Result<(), GcpError> {
        self.http.delete::<Value>(&self.secretmanager_url(name)).await?;
        Ok(())
    }

    async fn get_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError> {
        self.http.get(&self.secretmanager_url(name)).await
    }

    async fn add_secret_version(&self, parent: &str, data: &[u8]) -> Result<SecretVersion, GcpError> {
        let request = json!({ "payload": { "data": STANDARD.encode(data) } });
        self.http
            .post(&self.secretmanager_url(&format!("{parent}:addVersion")), &request)
            .await
    }

    async fn access_secret_version(&self, name: &str) -> Result<Vec<u8>, GcpError> {
        let response: AccessSecretVersionResponse = self
            .http
            .get(&self.secretmanager_url(&format!("{name}:access")))
            .await?;
        let data = response.payload.map(|p| p.data).unwrap_or_default();
        STANDARD
            .decode(data)
            .map_err(|e| GcpError::InvalidRequest(format!("payload of {name} is not base64: {e}")))
    }

    async fn enable_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError> {
        self.version_action(name, "enable").await
    }

    async fn disable_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError> {
        self.version_action(name, "disable").await
    }

    async fn destroy_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError> {
        self.version_action(name, "destroy").await
    }
}
