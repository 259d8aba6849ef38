//! Cloud KMS operations for MockGcpClient

use super::{MockGcpClient, get_or_not_found, insert_new, lock, merge, now};
use crate::error::GcpError;
use crate::gcp_trait::KmsApi;
use crate::models::*;

#[async_trait::async_trait]
impl KmsApi for MockGcpClient {
    async fn get_key_ring(&self, name: &str) -> Result<KeyRing, GcpError> {
        self.begin("get_key_ring", name)?;
        get_or_not_found(&self.key_rings, name, "key ring")
    }

    async fn create_key_ring(&self, parent: &str, key_ring_id: &str, _key_ring: &KeyRing) -> Result<KeyRing, GcpError> {
        let name = format!("{parent}/keyRings/{key_ring_id}");
        self.begin("create_key_ring", &name)?;
        let stored = KeyRing {
            name: name.clone(),
            create_time: now(),
        };
        insert_new(&self.key_rings, &name, "key ring", stored)
    }

    async fn get_crypto_key(&self, name: &str) -> Result<CryptoKey, GcpError> {
        self.begin("get_crypto_key", name)?;
        get_or_not_found(&self.crypto_keys, name, "crypto key")
    }

    async fn create_crypto_key(&self, parent: &str, crypto_key_id: &str, crypto_key: &CryptoKey) -> Result<CryptoKey, GcpError> {
        let name = format!("{parent}/cryptoKeys/{crypto_key_id}");
        self.begin("create_crypto_key", &name)?;
        if !lock(&self.key_rings).contains_key(parent) {
            return Err(GcpError::NotFound(format!("key ring {parent} not found")));
        }

        let mut stored = crypto_key.clone();
        stored.name = name.clone();
        stored.create_time = now();
        let template = stored.version_template.get_or_insert_with(Default::default);
        if template.protection_level.is_empty() {
            template.protection_level = "SOFTWARE".to_string();
        }
        if template.algorithm.is_empty() {
            template.algorithm = "GOOGLE_SYMMETRIC_ENCRYPTION".to_string();
        }
        if stored.purpose == "ENCRYPT_DECRYPT" {
            stored.primary = Some(CryptoKeyVersion {
                name: format!("{name}/cryptoKeyVersions/1"),
                state: "ENABLED".to_string(),
                protection_level: template.protection_level.clone(),
                algorithm: template.algorithm.clone(),
                create_time: stored.create_time.clone(),
            });
        }
        insert_new(&self.crypto_keys, &name, "crypto key", stored)
    }

    async fn patch_crypto_key(&self, name: &str, crypto_key: &CryptoKey, update_mask: &[String]) -> Result<CryptoKey, GcpError> {
        self.begin("patch_crypto_key", name)?;
        if update_mask.is_empty() {
            return Err(GcpError::InvalidRequest("updateMask is required".to_string()));
        }
        let existing = get_or_not_found(&self.crypto_keys, name, "crypto key")?;
        let patched = merge(&existing, crypto_key)?;
        lock(&self.crypto_keys).insert(name.to_string(), patched.clone());
        Ok(patched)
    }

    async fn get_crypto_key_iam_policy(&self, resource: &str) -> Result<Policy, GcpError> {
        self.begin("get_crypto_key_iam_policy", resource)?;
        if !lock(&self.crypto_keys).contains_key(resource) {
            return Err(GcpError::NotFound(format!("crypto key {resource} not found")));
        }
        Ok(lock(&self.policies).get(resource).cloned().unwrap_or_else(|| Policy {
            etag: "ACAB".to_string(),
            ..Default::default()
        }))
    }

    async fn set_crypto_key_iam_policy(&self, resource: &str, policy: &Policy) -> Result<Policy, GcpError> {
        self.begin("set_crypto_key_iam_policy", resource)?;
        let mut policies = lock(&self.policies);
        let current_etag = policies.get(resource).map_or("ACAB", |p| p.etag.as_str());
        if !policy.etag.is_empty() && policy.etag != current_etag {
            return Err(GcpError::Conflict(format!(
                "etag of policy on {resource} does not match"
            )));
        }
        let stored = Policy {
            bindings: policy.bindings.clone(),
            etag: format!("etag-{}", self.next_id()),
            version: 1,
        };
        policies.insert(resource.to_string(), stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_policy_checks_etag() {
        let mock = MockGcpClient::new();
        let parent = "projects/p/locations/global";
        mock.create_key_ring(parent, "ring", &KeyRing::default()).await.unwrap();
        let key = CryptoKey {
            purpose: "ENCRYPT_DECRYPT".to_string(),
            ..Default::default()
        };
        let created = mock
            .create_crypto_key(&format!("{parent}/keyRings/ring"), "key", &key)
            .await
            .unwrap();
        assert!(created.primary.is_some());

        let observed = mock.get_crypto_key_iam_policy(&created.name).await.unwrap();
        assert!(observed.bindings.is_empty());

        let desired = Policy {
            bindings: vec![Binding {
                role: "roles/cloudkms.cryptoKeyEncrypter".to_string(),
                members: vec!["user:a@example.com".to_string()],
                condition: None,
            }],
            etag: observed.etag.clone(),
            version: 0,
        };
        let stored = mock.set_crypto_key_iam_policy(&created.name, &desired).await.unwrap();
        assert_ne!(stored.etag, observed.etag);

        // The old etag is now stale.
        assert!(matches!(
            mock.set_crypto_key_iam_policy(&created.name, &desired).await,
            Err(GcpError::Conflict(_))
        ));
    }
}
