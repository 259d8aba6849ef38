//! Cloud KMS v1

use super::{GcpClient, body, mask};
use crate::common::with_query;
use crate::error::GcpError;
use crate::gcp_trait::KmsApi;
use crate::models::*;
use serde_json::json;

impl GcpClient {
    fn kms_url(&self, name: &str) -> String {
        format!("{}/{}", self.endpoints.kms, name)
    }
}

#[async_trait::async_trait]
impl KmsApi for GcpClient {
    async fn get_key_ring(&self, name: &str) -> Result<KeyRing, GcpError> {
        self.http.get(&self.kms_url(name)).await
    }

    async fn create_key_ring(&self, parent: &str, key_ring_id: &str, key_ring: &KeyRing) -> Result<KeyRing, GcpError> {
        let url = with_query(
            &self.kms_url(&format!("{parent}/keyRings")),
            &[("keyRingId", key_ring_id)],
        );
        self.http.post(&url, &body(key_ring)?).await
    }

    async fn get_crypto_key(&self, name: &str) -> Result<CryptoKey, GcpError> {
        self.http.get(&self.kms_url(name)).await
    }

    async fn create_crypto_key(&self, parent: &str, crypto_key_id: &str, crypto_key: &CryptoKey) -> Result<CryptoKey, GcpError> {
        let url = with_query(
            &self.kms_url(&format!("{parent}/cryptoKeys")),
            &[("cryptoKeyId", crypto_key_id)],
        );
        self.http.post(&url, &body(crypto_key)?).await
    }

    async fn patch_crypto_key(&self, name: &str, crypto_key: &CryptoKey, update_mask: &[String]) -> Result<CryptoKey, GcpError> {
        let url = with_query(&self.kms_url(name), &[("updateMask", mask(update_mask).as_str())]);
        self.http.patch(&url, &body(crypto_key)?).await
    }

    async fn get_crypto_key_iam_policy(&self, resource: &str) -> Result<Policy, GcpError> {
        self.http
            .get(&self.kms_url(&format!("{resource}:getIamPolicy")))
            .await
    }

    async fn set_crypto_key_iam_policy(&self, resource: &str, policy: &Policy) -> Result<Policy, GcpError> {
        // An empty binding list must still be sent to clear the policy.
        let mut policy_body = body(policy)?;
        if let Some(fields) = policy_body.as_object_mut() {
            fields.entry("bindings").or_insert_with(|| json!([]));
        }
        self.http
            .post(
                &self.kms_url(&format!("{resource}:setIamPolicy")),
                &json!({ "policy": policy_body }),
            )
            .await
    }
}
