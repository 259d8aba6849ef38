//! Mock GcpClient for unit testing
//!
//! This module provides an in-memory implementation of every service trait
//! so controllers can be tested without a Google Cloud project.
//!
//! The mock is organized into service modules:
//! - `compute.rs` - networks, subnetworks, firewalls, addresses
//! - `sqladmin.rs` - Cloud SQL instances
//! - `kms.rs` - key rings, crypto keys, IAM policies
//! - `iam.rs` - service accounts
//! - `pubsub.rs` - topics, subscriptions
//! - `secretmanager.rs` - secrets, secret versions
//!
//! Every call is recorded (see [`MockGcpClient::calls`]) and individual
//! methods can be made to fail with [`MockGcpClient::fail_on`].

mod compute;
mod iam;
mod kms;
mod pubsub;
mod secretmanager;
mod sqladmin;

use crate::common::wire;
use crate::error::GcpError;
use crate::models::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Store<T> = Arc<Mutex<HashMap<String, T>>>;

/// Lock a store, recovering the data from a poisoned lock
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock GcpClient for testing
///
/// Compute and Cloud SQL resources are keyed `project/name` or
/// `project/region/name`; everything else by its full resource name.
#[derive(Clone, Default)]
pub struct MockGcpClient {
    pub(crate) networks: Store<Network>,
    pub(crate) subnetworks: Store<Subnetwork>,
    pub(crate) firewalls: Store<Firewall>,
    pub(crate) addresses: Store<Address>,
    pub(crate) global_addresses: Store<Address>,
    pub(crate) instances: Store<DatabaseInstance>,
    pub(crate) key_rings: Store<KeyRing>,
    pub(crate) crypto_keys: Store<CryptoKey>,
    pub(crate) policies: Store<Policy>,
    pub(crate) service_accounts: Store<ServiceAccount>,
    pub(crate) topics: Store<Topic>,
    pub(crate) subscriptions: Store<Subscription>,
    pub(crate) secrets: Store<Secret>,
    pub(crate) secret_versions: Store<SecretVersion>,
    pub(crate) payloads: Store<Vec<u8>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
    pub(crate) failures: Arc<Mutex<HashMap<String, String>>>,
}

impl MockGcpClient {
    /// Create a new, empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls made so far, as `method target`
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Whether a call to `method` was made
    pub fn called(&self, method: &str) -> bool {
        lock(&self.calls)
            .iter()
            .any(|c| c.split(' ').next() == Some(method))
    }

    /// Make every later call to `method` fail with an API error
    pub fn fail_on(&self, method: &str, message: &str) {
        lock(&self.failures).insert(method.to_string(), message.to_string());
    }

    /// Record a call and return the injected failure, if any
    pub(crate) fn begin(&self, method: &str, target: &str) -> Result<(), GcpError> {
        lock(&self.calls).push(format!("{method} {target}"));
        match lock(&self.failures).get(method) {
            Some(message) => Err(GcpError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = lock(&self.next_id);
        *id += 1;
        *id
    }

    // Test setup and inspection

    /// Store a network (for test setup)
    pub fn add_network(&self, project: &str, network: Network) {
        lock(&self.networks).insert(format!("{project}/{}", network.name), network);
    }

    /// Stored network
    pub fn network(&self, project: &str, name: &str) -> Option<Network> {
        lock(&self.networks).get(&format!("{project}/{name}")).cloned()
    }

    /// Store a subnetwork (for test setup)
    pub fn add_subnetwork(&self, project: &str, region: &str, subnetwork: Subnetwork) {
        lock(&self.subnetworks).insert(format!("{project}/{region}/{}", subnetwork.name), subnetwork);
    }

    /// Stored subnetwork
    pub fn subnetwork(&self, project: &str, region: &str, name: &str) -> Option<Subnetwork> {
        lock(&self.subnetworks).get(&format!("{project}/{region}/{name}")).cloned()
    }

    /// Store a firewall (for test setup)
    pub fn add_firewall(&self, project: &str, firewall: Firewall) {
        lock(&self.firewalls).insert(format!("{project}/{}", firewall.name), firewall);
    }

    /// Stored firewall
    pub fn firewall(&self, project: &str, name: &str) -> Option<Firewall> {
        lock(&self.firewalls).get(&format!("{project}/{name}")).cloned()
    }

    /// Store a regional address (for test setup)
    pub fn add_address(&self, project: &str, region: &str, address: Address) {
        lock(&self.addresses).insert(format!("{project}/{region}/{}", address.name), address);
    }

    /// Stored regional address
    pub fn address(&self, project: &str, region: &str, name: &str) -> Option<Address> {
        lock(&self.addresses).get(&format!("{project}/{region}/{name}")).cloned()
    }

    /// Store a global address (for test setup)
    pub fn add_global_address(&self, project: &str, address: Address) {
        lock(&self.global_addresses).insert(format!("{project}/{}", address.name), address);
    }

    /// Stored global address
    pub fn global_address(&self, project: &str, name: &str) -> Option<Address> {
        lock(&self.global_addresses).get(&format!("{project}/{name}")).cloned()
    }

    /// Store a Cloud SQL instance (for test setup)
    pub fn add_instance(&self, project: &str, instance: DatabaseInstance) {
        lock(&self.instances).insert(format!("{project}/{}", instance.name), instance);
    }

    /// Stored Cloud SQL instance
    pub fn instance(&self, project: &str, name: &str) -> Option<DatabaseInstance> {
        lock(&self.instances).get(&format!("{project}/{name}")).cloned()
    }

    /// Store a key ring under its full name (for test setup)
    pub fn add_key_ring(&self, key_ring: KeyRing) {
        lock(&self.key_rings).insert(key_ring.name.clone(), key_ring);
    }

    /// Stored key ring
    pub fn key_ring(&self, name: &str) -> Option<KeyRing> {
        lock(&self.key_rings).get(name).cloned()
    }

    /// Store a crypto key under its full name (for test setup)
    pub fn add_crypto_key(&self, crypto_key: CryptoKey) {
        lock(&self.crypto_keys).insert(crypto_key.name.clone(), crypto_key);
    }

    /// Stored crypto key
    pub fn crypto_key(&self, name: &str) -> Option<CryptoKey> {
        lock(&self.crypto_keys).get(name).cloned()
    }

    /// Store the IAM policy of a crypto key (for test setup)
    pub fn set_policy(&self, resource: &str, policy: Policy) {
        lock(&self.policies).insert(resource.to_string(), policy);
    }

    /// Stored IAM policy of a crypto key
    pub fn policy(&self, resource: &str) -> Option<Policy> {
        lock(&self.policies).get(resource).cloned()
    }

    /// Store a service account under its full name (for test setup)
    pub fn add_service_account(&self, account: ServiceAccount) {
        lock(&self.service_accounts).insert(account.name.clone(), account);
    }

    /// Stored service account
    pub fn service_account(&self, name: &str) -> Option<ServiceAccount> {
        lock(&self.service_accounts).get(name).cloned()
    }

    /// Store a topic under its full name (for test setup)
    pub fn add_topic(&self, topic: Topic) {
        lock(&self.topics).insert(topic.name.clone(), topic);
    }

    /// Stored topic
    pub fn topic(&self, name: &str) -> Option<Topic> {
        lock(&self.topics).get(name).cloned()
    }

    /// Store a subscription under its full name (for test setup)
    pub fn add_subscription(&self, subscription: Subscription) {
        lock(&self.subscriptions).insert(subscription.name.clone(), subscription);
    }

    /// Stored subscription
    pub fn subscription(&self, name: &str) -> Option<Subscription> {
        lock(&self.subscriptions).get(name).cloned()
    }

    /// Store a secret under its full name (for test setup)
    pub fn add_secret(&self, secret: Secret) {
        lock(&self.secrets).insert(secret.name.clone(), secret);
    }

    /// Stored secret
    pub fn secret(&self, name: &str) -> Option<Secret> {
        lock(&self.secrets).get(name).cloned()
    }

    /// Store a secret version and its payload (for test setup)
    pub fn add_secret_version(&self, version: SecretVersion, payload: &[u8]) {
        lock(&self.payloads).insert(version.name.clone(), payload.to_vec());
        lock(&self.secret_versions).insert(version.name.clone(), version);
    }

    /// Stored secret version
    pub fn secret_version(&self, name: &str) -> Option<SecretVersion> {
        lock(&self.secret_versions).get(name).cloned()
    }
}

/// Fetch a stored resource or fail with NotFound
pub(crate) fn get_or_not_found<T: Clone>(store: &Store<T>, key: &str, kind: &str) -> Result<T, GcpError> {
    lock(store)
        .get(key)
        .cloned()
        .ok_or_else(|| GcpError::NotFound(format!("{kind} {key} not found")))
}

/// Store a new resource or fail with Conflict
pub(crate) fn insert_new<T: Clone>(store: &Store<T>, key: &str, kind: &str, value: T) -> Result<T, GcpError> {
    let mut store = lock(store);
    if store.contains_key(key) {
        return Err(GcpError::Conflict(format!("{kind} {key} already exists")));
    }
    store.insert(key.to_string(), value.clone());
    Ok(value)
}

/// Remove a stored resource or fail with NotFound
pub(crate) fn remove_or_not_found<T>(store: &Store<T>, key: &str, kind: &str) -> Result<T, GcpError> {
    lock(store)
        .remove(key)
        .ok_or_else(|| GcpError::NotFound(format!("{kind} {key} not found")))
}

/// Apply the non-zero fields of `patch` over `existing`, as PATCH does
pub(crate) fn merge<T: Serialize + DeserializeOwned>(existing: &T, patch: &T) -> Result<T, GcpError> {
    let mut base = serde_json::to_value(existing)?;
    merge_value(&mut base, wire::to_wire(patch)?);
    Ok(serde_json::from_value(base)?)
}

fn merge_value(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_value(existing, value)
                    }
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Completed operation targeting `target_link`
pub(crate) fn done(operation_type: &str, target_link: &str, id: u64) -> Operation {
    Operation {
        name: format!("operation-{id}"),
        operation_type: operation_type.to_string(),
        status: "DONE".to_string(),
        target_link: target_link.to_string(),
        self_link: String::new(),
    }
}

/// RFC 3339 timestamp for server-assigned times
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp_trait::ComputeApi;

    #[tokio::test]
    async fn test_calls_and_injected_failures() {
        let mock = MockGcpClient::new();
        mock.fail_on("get_network", "backend unavailable");

        let err = mock.get_network("p", "net").await.unwrap_err();
        assert!(matches!(err, GcpError::Api { status: 500, .. }));
        assert!(mock.called("get_network"));
        assert_eq!(mock.calls(), vec!["get_network p/net".to_string()]);
    }

    #[test]
    fn test_merge_keeps_unpatched_fields() {
        let existing = Firewall {
            name: "fw".to_string(),
            priority: 1000,
            source_ranges: vec!["10.0.0.0/8".to_string()],
            ..Default::default()
        };
        let patch = Firewall {
            disabled: true,
            ..Default::default()
        };
        let merged = merge(&existing, &patch).unwrap();
        assert_eq!(merged.priority, 1000);
        assert_eq!(merged.source_ranges, vec!["10.0.0.0/8".to_string()]);
        assert!(merged.disabled);
    }
}
