//! Test utilities for unit testing reconcilers
//!
//! In-memory stand-ins for the Kubernetes API and fixtures for managed
//! resources.

use crate::error::ControllerError;
use crate::managed::ConnectionDetails;
use crate::managed::secret_store::SecretStore;
use crate::providerconfig::Connection;
use crate::reference::ObjectReader;
use async_trait::async_trait;
use crds::{Condition, Managed, Network, NetworkParameters, NetworkSpec, SecretKeySelector, SecretReference};
use gcp_client::MockGcpClient;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::ResourceExt;
use kube::core::{ApiResource, DynamicObject};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Project of connections built by [`mock_connection`]
pub const TEST_PROJECT: &str = "test-project";

/// `ObjectReader` over a fixed set of objects
#[derive(Debug, Default, Clone)]
pub struct MemoryObjectReader {
    objects: Vec<DynamicObject>,
}

impl MemoryObjectReader {
    /// Add an object; it must serialize with `apiVersion` and `kind`
    pub fn with(mut self, object: &impl Serialize) -> Self {
        let value = serde_json::to_value(object).unwrap();
        self.objects.push(serde_json::from_value(value).unwrap());
        self
    }

    fn of_kind<'a>(&'a self, resource: &'a ApiResource) -> impl Iterator<Item = &'a DynamicObject> + 'a {
        self.objects.iter().filter(move |o| {
            o.types
                .as_ref()
                .is_some_and(|t| t.api_version == resource.api_version && t.kind == resource.kind)
        })
    }
}

fn matches_labels(object: &DynamicObject, label_selector: &str) -> bool {
    let labels = object.labels();
    label_selector
        .split(',')
        .filter(|term| !term.is_empty())
        .all(|term| match term.split_once('=') {
            Some((k, v)) => labels.get(k).is_some_and(|have| have == v),
            None => labels.contains_key(term),
        })
}

#[async_trait]
impl ObjectReader for MemoryObjectReader {
    async fn get(&self, resource: &ApiResource, name: &str) -> Result<Option<DynamicObject>, kube::Error> {
        Ok(self.of_kind(resource).find(|o| o.name_any() == name).cloned())
    }

    async fn list(&self, resource: &ApiResource, label_selector: &str) -> Result<Vec<DynamicObject>, kube::Error> {
        Ok(self
            .of_kind(resource)
            .filter(|o| matches_labels(o, label_selector))
            .cloned()
            .collect())
    }
}

type SecretData = BTreeMap<String, Vec<u8>>;

/// `SecretStore` keeping Secrets in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySecretStore {
    secrets: Arc<Mutex<HashMap<(String, String), SecretData>>>,
    owners: Arc<Mutex<HashMap<(String, String), OwnerReference>>>,
}

impl MemorySecretStore {
    /// Store one key of a Secret
    pub fn insert(&self, namespace: &str, name: &str, key: &str, value: &[u8]) {
        self.secrets
            .lock()
            .unwrap()
            .entry((namespace.to_string(), name.to_string()))
            .or_default()
            .insert(key.to_string(), value.to_vec());
    }

    /// Data of a stored Secret
    pub fn get(&self, namespace: &str, name: &str) -> Option<SecretData> {
        self.secrets
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Owner recorded when the Secret was published
    pub fn owner(&self, namespace: &str, name: &str) -> Option<OwnerReference> {
        self.owners
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn read_key(&self, selector: &SecretKeySelector) -> Result<Vec<u8>, ControllerError> {
        self.get(&selector.namespace, &selector.name)
            .and_then(|mut data| data.remove(&selector.key))
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
        let key = (to.namespace.clone(), to.name.clone());
        if let Some(owner) = owner {
            self.owners.lock().unwrap().insert(key.clone(), owner);
        }
        self.secrets.lock().unwrap().entry(key).or_default().extend(details.clone());
        Ok(())
    }

    async fn unpublish(&self, to: &SecretReference) -> Result<(), ControllerError> {
        self.secrets
            .lock()
            .unwrap()
            .remove(&(to.namespace.clone(), to.name.clone()));
        Ok(())
    }
}

/// Connection to `mock` for [`TEST_PROJECT`] with an empty secret store
pub fn mock_connection(mock: &Arc<MockGcpClient>) -> Connection {
    mock_connection_with_secrets(mock, MemorySecretStore::default())
}

/// Connection to `mock` for [`TEST_PROJECT`] reading Secrets from `secrets`
pub fn mock_connection_with_secrets(mock: &Arc<MockGcpClient>, secrets: MemorySecretStore) -> Connection {
    Connection::from_client(TEST_PROJECT, mock.clone(), Arc::new(secrets))
}

/// Network named `name` whose external name is `name`
pub fn network(name: &str, params: NetworkParameters) -> Network {
    named(Network::new(
        name,
        NetworkSpec {
            resource_spec: Default::default(),
            for_provider: params,
        },
    ))
}

/// `resource` with its external name set to its object name
pub fn named<K: Managed>(mut resource: K) -> K {
    let name = resource.name_any();
    resource.set_external_name(&name);
    resource
}

/// `resource` reporting Ready=True
pub fn ready<K: Managed>(mut resource: K) -> K {
    resource.set_conditions([Condition::available()]);
    resource
}
