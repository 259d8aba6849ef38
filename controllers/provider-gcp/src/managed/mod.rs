//! Managed resource runtime
//!
//! Every managed kind is reconciled the same way: observe the external
//! resource, then create, update or delete it until it matches its desired state.
//! The kind-specific part lives behind [`ExternalClient`]; the kube plumbing
//! (finalizers, patches, requeues) lives in [`reconciler`].

pub mod reconciler;
pub mod secret_store;

use crate::error::ControllerError;
use crate::providerconfig::Connection;
use crate::reference::ResolveReferences;
use async_trait::async_trait;
use crds::{Condition, DeletionPolicy, Managed};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Connection details published to the connection secret
pub type ConnectionDetails = BTreeMap<String, Vec<u8>>;

/// What observing the external resource found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    /// The external resource exists
    pub resource_exists: bool,
    /// The external resource matches the desired state
    pub resource_up_to_date: bool,
    /// Unset spec fields were filled from the external resource
    pub resource_late_initialized: bool,
    /// Details to publish
    pub connection_details: ConnectionDetails,
}

impl ExternalObservation {
    /// The external resource does not exist
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Result of creating the external resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalCreation {
    /// Details only known at creation, e.g. a generated password
    pub connection_details: ConnectionDetails,
}

/// Result of updating the external resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalUpdate {
    pub connection_details: ConnectionDetails,
}

/// Result of deleting the external resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// Deletion was requested; observe again to see it gone
    Pending,
    /// Nothing is left to wait for
    Complete,
}

/// Kind-specific operations on the external resource
#[async_trait]
pub trait ExternalClient<K: Managed>: Send + Sync {
    /// Observe the external resource named by the managed resource
    ///
    /// Updates `atProvider`, the Ready condition and late-initialized spec
    /// fields on `mr`.
    async fn observe(&self, mr: &mut K) -> Result<ExternalObservation, ControllerError>;

    /// Create the external resource
    async fn create(&self, mr: &mut K) -> Result<ExternalCreation, ControllerError>;

    /// Bring the external resource in line with the desired state
    async fn update(&self, mr: &mut K) -> Result<ExternalUpdate, ControllerError>;

    /// Delete the external resource; not found counts as deleted
    async fn delete(&self, mr: &mut K) -> Result<Deletion, ControllerError>;
}

/// A managed kind the runtime can reconcile
pub trait Setup: Managed + ResolveReferences {
    /// Whether the external name defaults to `metadata.name`
    const NAME_AS_EXTERNAL_NAME: bool = true;

    /// External client for this kind over `conn`
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>>;
}

/// Run `fill` against the parameters and report whether it changed them
pub fn late_initialize<P: Clone + PartialEq>(params: &mut P, fill: impl FnOnce(&mut P)) -> bool {
    let before = params.clone();
    fill(params);
    *params != before
}

/// Result of one observe/create/update pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Details gathered from observe and create/update
    pub connection_details: ConnectionDetails,
    /// Spec or external-name annotation changed and must be written back
    pub spec_changed: bool,
}

/// Observe the external resource and create or update it as needed
pub async fn sync_external<K: Managed>(
    client: &dyn ExternalClient<K>,
    mr: &mut K,
) -> Result<SyncOutcome, ControllerError> {
    let kind = K::kind(&());
    let external_name_before = mr.external_name().map(str::to_string);
    let observation = client.observe(mr).await?;
    let mut details = observation.connection_details;

    if !observation.resource_exists {
        info!("Creating external {} {}", kind, mr.meta().name.as_deref().unwrap_or_default());
        let creation = client.create(mr).await?;
        mr.set_conditions([Condition::creating()]);
        details.extend(creation.connection_details);
    } else if !observation.resource_up_to_date {
        info!("Updating external {} {}", kind, mr.meta().name.as_deref().unwrap_or_default());
        let update = client.update(mr).await?;
        details.extend(update.connection_details);
    } else {
        debug!("External {} {} is up to date", kind, mr.meta().name.as_deref().unwrap_or_default());
    }

    let external_name_changed = mr.external_name().map(str::to_string) != external_name_before;
    Ok(SyncOutcome {
        connection_details: details,
        spec_changed: observation.resource_late_initialized || external_name_changed,
    })
}

/// Delete the external resource of a managed resource being deleted
///
/// Returns `true` once nothing external is left and the finalizer can go.
pub async fn finalize_external<K: Managed>(client: &dyn ExternalClient<K>, mr: &mut K) -> Result<bool, ControllerError> {
    if mr.resource_spec().deletion_policy == DeletionPolicy::Orphan {
        return Ok(true);
    }
    let observation = client.observe(mr).await?;
    if !observation.resource_exists {
        return Ok(true);
    }
    info!(
        "Deleting external {} {}",
        K::kind(&()),
        mr.meta().name.as_deref().unwrap_or_default()
    );
    let deletion = client.delete(mr).await?;
    mr.set_conditions([Condition::deleting()]);
    Ok(deletion == Deletion::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_connection, network};
    use crds::{ConditionType, DeletionPolicy, NetworkParameters};
    use gcp_client::MockGcpClient;
    use gcp_client::models::compute as gcp;
    use std::sync::Arc;

    fn custom_vpc() -> NetworkParameters {
        NetworkParameters {
            auto_create_subnetworks: Some(false),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_absent_resource_is_created() {
        let mock = Arc::new(MockGcpClient::new());
        let client = crds::Network::external(mock_connection(&mock));
        let mut mr = network("vpc", custom_vpc());

        let outcome = sync_external(client.as_ref(), &mut mr).await.unwrap();
        assert!(!outcome.spec_changed);
        assert!(mock.network("test-project", "vpc").is_some());
        let ready = mr.resource_status().and_then(|s| s.condition(ConditionType::Ready)).unwrap();
        assert!(ready.equal(&Condition::creating()));
    }

    #[tokio::test]
    async fn test_stale_resource_is_updated() {
        let mock = Arc::new(MockGcpClient::new());
        mock.add_network(
            "test-project",
            gcp::Network {
                name: "vpc".to_string(),
                description: "old".to_string(),
                ..Default::default()
            },
        );
        let client = crds::Network::external(mock_connection(&mock));
        let mut mr = network(
            "vpc",
            NetworkParameters {
                description: Some("new".to_string()),
                ..custom_vpc()
            },
        );

        sync_external(client.as_ref(), &mut mr).await.unwrap();
        assert!(mock.called("patch_network"));
        assert!(!mock.called("insert_network"));
    }

    #[tokio::test]
    async fn test_up_to_date_resource_is_left_alone() {
        let mock = Arc::new(MockGcpClient::new());
        mock.add_network(
            "test-project",
            gcp::Network {
                name: "vpc".to_string(),
                self_link: "https://www.googleapis.com/compute/v1/projects/test-project/global/networks/vpc".to_string(),
                ..Default::default()
            },
        );
        let client = crds::Network::external(mock_connection(&mock));
        let mut mr = network("vpc", NetworkParameters::default());

        let outcome = sync_external(client.as_ref(), &mut mr).await.unwrap();
        assert!(!outcome.spec_changed);
        assert_eq!(mock.calls(), vec!["get_network test-project/vpc".to_string()]);
        assert!(mr.is_ready());
    }

    #[tokio::test]
    async fn test_delete_of_missing_resource_finishes() {
        let mock = Arc::new(MockGcpClient::new());
        let client = crds::Network::external(mock_connection(&mock));
        let mut mr = network("vpc", NetworkParameters::default());

        assert!(finalize_external(client.as_ref(), &mut mr).await.unwrap());
        assert!(!mock.called("delete_network"));
    }

    #[tokio::test]
    async fn test_delete_of_existing_resource_waits() {
        let mock = Arc::new(MockGcpClient::new());
        mock.add_network(
            "test-project",
            gcp::Network {
                name: "vpc".to_string(),
                ..Default::default()
            },
        );
        let client = crds::Network::external(mock_connection(&mock));
        let mut mr = network("vpc", NetworkParameters::default());

        assert!(!finalize_external(client.as_ref(), &mut mr).await.unwrap());
        assert!(mock.called("delete_network"));
        assert!(mock.network("test-project", "vpc").is_none());
        assert!(finalize_external(client.as_ref(), &mut mr).await.unwrap());
    }

    #[tokio::test]
    async fn test_orphan_policy_skips_external_delete() {
        let mock = Arc::new(MockGcpClient::new());
        mock.add_network(
            "test-project",
            gcp::Network {
                name: "vpc".to_string(),
                ..Default::default()
            },
        );
        let client = crds::Network::external(mock_connection(&mock));
        let mut mr = network("vpc", NetworkParameters::default());
        mr.spec.resource_spec.deletion_policy = DeletionPolicy::Orphan;

        assert!(finalize_external(client.as_ref(), &mut mr).await.unwrap());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_late_initialize_reports_change() {
        let mut params = NetworkParameters::default();
        assert!(late_initialize(&mut params, |p| p.description = Some("x".to_string())));
        assert!(!late_initialize(&mut params, |p| p.description = Some("x".to_string())));
    }
}
