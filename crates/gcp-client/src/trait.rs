//! Service traits for mocking
//!
//! Each Google API the provider calls is abstracted behind a trait. The
//! concrete `GcpClient` implements all of them, and tests use
//! `MockGcpClient`. All async methods must be `Send` to work with Tokio's
//! work-stealing runtime.
//!
//! Compute and Cloud SQL address resources by project, region and short
//! name; the other services take full resource names such as
//! `projects/p/locations/l/keyRings/k`.

use crate::error::GcpError;
use crate::models::*;

/// Compute Engine v1 operations
#[async_trait::async_trait]
pub trait ComputeApi: Send + Sync {
    async fn get_network(&self, project: &str, name: &str) -> Result<Network, GcpError>;
    async fn insert_network(&self, project: &str, network: &Network) -> Result<Operation, GcpError>;
    async fn patch_network(&self, project: &str, name: &str, network: &Network) -> Result<Operation, GcpError>;
    async fn switch_network_to_custom_mode(&self, project: &str, name: &str) -> Result<Operation, GcpError>;
    async fn delete_network(&self, project: &str, name: &str) -> Result<Operation, GcpError>;

    async fn get_subnetwork(&self, project: &str, region: &str, name: &str) -> Result<Subnetwork, GcpError>;
    async fn insert_subnetwork(&self, project: &str, region: &str, subnetwork: &Subnetwork) -> Result<Operation, GcpError>;
    async fn patch_subnetwork(&self, project: &str, region: &str, name: &str, subnetwork: &Subnetwork) -> Result<Operation, GcpError>;
    async fn delete_subnetwork(&self, project: &str, region: &str, name: &str) -> Result<Operation, GcpError>;

    async fn get_firewall(&self, project: &str, name: &str) -> Result<Firewall, GcpError>;
    async fn insert_firewall(&self, project: &str, firewall: &Firewall) -> Result<Operation, GcpError>;
    async fn patch_firewall(&self, project: &str, name: &str, firewall: &Firewall) -> Result<Operation, GcpError>;
    async fn delete_firewall(&self, project: &str, name: &str) -> Result<Operation, GcpError>;

    async fn get_address(&self, project: &str, region: &str, name: &str) -> Result<Address, GcpError>;
    async fn insert_address(&self, project: &str, region: &str, address: &Address) -> Result<Operation, GcpError>;
    async fn delete_address(&self, project: &str, region: &str, name: &str) -> Result<Operation, GcpError>;

    async fn get_global_address(&self, project: &str, name: &str) -> Result<Address, GcpError>;
    async fn insert_global_address(&self, project: &str, address: &Address) -> Result<Operation, GcpError>;
    async fn delete_global_address(&self, project: &str, name: &str) -> Result<Operation, GcpError>;
}

/// Cloud SQL Admin v1beta4 operations
#[async_trait::async_trait]
pub trait SqlAdminApi: Send + Sync {
    async fn get_instance(&self, project: &str, name: &str) -> Result<DatabaseInstance, GcpError>;
    async fn insert_instance(&self, project: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError>;
    async fn patch_instance(&self, project: &str, name: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError>;
    async fn delete_instance(&self, project: &str, name: &str) -> Result<Operation, GcpError>;
}

/// Cloud KMS v1 operations
#[async_trait::async_trait]
pub trait KmsApi: Send + Sync {
    async fn get_key_ring(&self, name: &str) -> Result<KeyRing, GcpError>;
    async fn create_key_ring(&self, parent: &str, key_ring_id: &str, key_ring: &KeyRing) -> Result<KeyRing, GcpError>;

    async fn get_crypto_key(&self, name: &str) -> Result<CryptoKey, GcpError>;
    async fn create_crypto_key(&self, parent: &str, crypto_key_id: &str, crypto_key: &CryptoKey) -> Result<CryptoKey, GcpError>;
    async fn patch_crypto_key(&self, name: &str, crypto_key: &CryptoKey, update_mask: &[String]) -> Result<CryptoKey, GcpError>;

    async fn get_crypto_key_iam_policy(&self, resource: &str) -> Result<Policy, GcpError>;
    async fn set_crypto_key_iam_policy(&self, resource: &str, policy: &Policy) -> Result<Policy, GcpError>;
}

/// IAM v1 operations
#[async_trait::async_trait]
pub trait IamApi: Send + Sync {
    async fn get_service_account(&self, name: &str) -> Result<ServiceAccount, GcpError>;
    async fn create_service_account(&self, project: &str, account_id: &str, account: &ServiceAccount) -> Result<ServiceAccount, GcpError>;
    async fn patch_service_account(&self, name: &str, account: &ServiceAccount, update_mask: &[String]) -> Result<ServiceAccount, GcpError>;
    async fn delete_service_account(&self, name: &str) -> Result<(), GcpError>;
}

/// Pub/Sub v1 operations
#[async_trait::async_trait]
pub trait PubSubApi: Send + Sync {
    async fn get_topic(&self, name: &str) -> Result<Topic, GcpError>;
    async fn create_topic(&self, topic: &Topic) -> Result<Topic, GcpError>;
    async fn patch_topic(&self, topic: &Topic, update_mask: &[String]) -> Result<Topic, GcpError>;
    async fn delete_topic(&self, name: &str) -> Result<(), GcpError>;

    async fn get_subscription(&self, name: &str) -> Result<Subscription, GcpError>;
    async fn create_subscription(&self, subscription: &Subscription) -> Result<Subscription, GcpError>;
    async fn patch_subscription(&self, subscription: &Subscription, update_mask: &[String]) -> Result<Subscription, GcpError>;
    async fn delete_subscription(&self, name: &str) -> Result<(), GcpError>;
}

/// Secret Manager v1 operations
#[async_trait::async_trait]
pub trait SecretManagerApi: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<Secret, GcpError>;
    async fn create_secret(&self, parent: &str, secret_id: &str, secret: &Secret) -> Result<Secret, GcpError>;
    async fn patch_secret(&self, name: &str, secret: &Secret, update_mask: &[String]) -> Result<Secret, GcpError>;
    async fn delete_secret(&self, name: &str) -> Result<(), GcpError>;

    async fn get_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError>;
    /// Add a version to the secret `parent` holding `data`
    async fn add_secret_version(&self, parent: &str, data: &[u8]) -> Result<SecretVersion, GcpError>;
    /// Payload of a version, decoded
    async fn access_secret_version(&self, name: &str) -> Result<Vec<u8>, GcpError>;
    async fn enable_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError>;
    async fn disable_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError>;
    async fn destroy_secret_version(&self, name: &str) -> Result<SecretVersion, GcpError>;
}
