//! Generic reconcile loop for managed resources
//!
//! One function serves every managed kind:
//!
//! 1. A deleted object has its external resource deleted (unless orphaned),
//!    its connection secret removed and then its finalizer dropped.
//! 2. A live object gets the finalizer and an external name, has its
//!    references resolved, and is synced against GCP.
//! 3. Spec changes (external name, resolved references, late-initialized
//!    fields) are merge-patched with the observed `resourceVersion`; status is
//!    merge-patched last.
//!
//! Errors set `Synced=False` on the object and requeue through the
//! per-object Fibonacci backoff.

use crate::controller::Context;
use crate::error::ControllerError;
use crate::managed::{ConnectionDetails, Setup, finalize_external, sync_external};
use crate::metrics::{RESULT_ERROR, RESULT_SUCCESS};
use crds::{Condition, DeletionPolicy, Managed};
use kube::api::{Patch, PatchParams};
use kube::{Api, Resource, ResourceExt};
use kube_runtime::controller::Action;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Finalizer guarding the external resource
pub const FINALIZER: &str = "finalizer.managedresource.crossplane.io";

/// Requeue interval while an external deletion is in progress
const DELETION_POLL: Duration = Duration::from_secs(10);

/// `Kind/name`, the key of an object in logs and the backoff table
pub fn object_key<K: Managed>(mr: &K) -> String {
    format!("{}/{}", K::kind(&()), mr.name_any())
}

/// Reconcile one managed resource
pub async fn reconcile<K: Setup>(mr: Arc<K>, ctx: Arc<Context>) -> Result<Action, ControllerError> {
    let started = Instant::now();
    let kind = K::kind(&()).to_string();
    let key = object_key(mr.as_ref());
    let api: Api<K> = Api::all(ctx.client.clone());

    debug!("Reconciling {}", key);
    let result = if mr.meta().deletion_timestamp.is_some() {
        finalize(&api, mr.as_ref().clone(), &ctx).await
    } else {
        sync(&api, mr.as_ref().clone(), &ctx).await
    };

    match result {
        Ok(action) => {
            ctx.metrics.observe(&kind, RESULT_SUCCESS, started.elapsed());
            ctx.backoff.reset(&key);
            Ok(action)
        }
        Err(e) => {
            ctx.metrics.observe(&kind, RESULT_ERROR, started.elapsed());
            record_error(&api, mr.as_ref(), &e).await;
            Err(e)
        }
    }
}

/// Requeue a failed object after its next backoff delay
pub fn error_policy<K: Managed>(mr: Arc<K>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    let key = object_key(mr.as_ref());
    let delay = ctx.backoff.next(&key);
    warn!("Reconcile of {} failed, retrying in {}s: {}", key, delay.as_secs(), error);
    Action::requeue(delay)
}

async fn sync<K: Setup>(api: &Api<K>, mut mr: K, ctx: &Context) -> Result<Action, ControllerError> {
    if !has_finalizer(&mr) {
        let finalizers = with_finalizer(&mr);
        let patched = patch_metadata(api, &mr, json!({ "finalizers": finalizers })).await?;
        mr.meta_mut().finalizers = patched.meta().finalizers.clone();
        mr.meta_mut().resource_version = patched.resource_version();
        debug!("Added finalizer to {}", object_key(&mr));
    }

    let mut spec_changed = initialize_external_name(&mut mr);

    let resolved = mr.resolve_references(ctx.reader.as_ref()).await?;
    spec_changed |= resolved.for_provider() != mr.for_provider();
    mr = resolved;
    if spec_changed {
        patch_spec(api, &mut mr).await?;
    }

    let connection = ctx.connector.connect(&mr).await?;
    let external = K::external(connection);
    let outcome = sync_external(external.as_ref(), &mut mr).await?;
    if outcome.spec_changed {
        patch_spec(api, &mut mr).await?;
    }

    publish_connection_details(&mr, &outcome.connection_details, ctx).await?;

    mr.set_conditions([Condition::reconcile_success()]);
    patch_status(api, &mr).await?;
    Ok(Action::requeue(ctx.config.poll_interval))
}

async fn finalize<K: Setup>(api: &Api<K>, mut mr: K, ctx: &Context) -> Result<Action, ControllerError> {
    if !has_finalizer(&mr) {
        return Ok(Action::await_change());
    }

    initialize_external_name(&mut mr);
    let gone = if mr.resource_spec().deletion_policy == DeletionPolicy::Orphan {
        info!("Orphaning external resource of {}", object_key(&mr));
        true
    } else {
        let connection = ctx.connector.connect(&mr).await?;
        let external = K::external(connection);
        finalize_external(external.as_ref(), &mut mr).await?
    };

    if !gone {
        mr.set_conditions([Condition::reconcile_success()]);
        patch_status(api, &mr).await?;
        return Ok(Action::requeue(DELETION_POLL));
    }

    if let Some(to) = &mr.resource_spec().write_connection_secret_to_ref {
        ctx.secrets.unpublish(to).await?;
    }
    let finalizers = without_finalizer(&mr);
    patch_metadata(api, &mr, json!({ "finalizers": finalizers })).await?;
    info!("Removed finalizer from {}", object_key(&mr));
    Ok(Action::await_change())
}

/// Set the external name to the object name where the kind wants that
fn initialize_external_name<K: Setup>(mr: &mut K) -> bool {
    if !K::NAME_AS_EXTERNAL_NAME || mr.external_name().is_some() {
        return false;
    }
    let name = mr.name_any();
    mr.set_external_name(&name);
    true
}

async fn publish_connection_details<K: Managed>(
    mr: &K,
    details: &ConnectionDetails,
    ctx: &Context,
) -> Result<(), ControllerError> {
    let Some(to) = &mr.resource_spec().write_connection_secret_to_ref else {
        return Ok(());
    };
    if details.is_empty() {
        return Ok(());
    }
    ctx.secrets.publish(mr.controller_owner_ref(&()), to, details).await
}

/// Whether `mr` carries the managed resource finalizer
pub fn has_finalizer<K: Resource>(mr: &K) -> bool {
    mr.meta()
        .finalizers
        .as_ref()
        .is_some_and(|f| f.iter().any(|s| s == FINALIZER))
}

fn with_finalizer<K: Resource>(mr: &K) -> Vec<String> {
    let mut finalizers = mr.meta().finalizers.clone().unwrap_or_default();
    if !finalizers.iter().any(|f| f == FINALIZER) {
        finalizers.push(FINALIZER.to_string());
    }
    finalizers
}

fn without_finalizer<K: Resource>(mr: &K) -> Vec<String> {
    mr.meta()
        .finalizers
        .iter()
        .flatten()
        .filter(|f| *f != FINALIZER)
        .cloned()
        .collect()
}

/// Merge patch writing the annotations and spec of `mr`
///
/// Carries `resourceVersion` so a concurrent edit fails with a conflict.
pub fn spec_patch<K: Managed>(mr: &K) -> Result<Value, ControllerError> {
    let object = serde_json::to_value(mr)?;
    Ok(json!({
        "metadata": {
            "annotations": mr.meta().annotations,
            "resourceVersion": mr.resource_version(),
        },
        "spec": object.get("spec").cloned().unwrap_or(Value::Null),
    }))
}

/// Merge patch writing the status of `mr`
pub fn status_patch<K: Managed>(mr: &K) -> Result<Value, ControllerError> {
    let object = serde_json::to_value(mr)?;
    Ok(json!({ "status": object.get("status").cloned().unwrap_or(Value::Null) }))
}

async fn patch_metadata<K: Managed>(api: &Api<K>, mr: &K, metadata: Value) -> Result<K, ControllerError> {
    let patch = json!({ "metadata": metadata });
    Ok(api
        .patch(&mr.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await?)
}

async fn patch_spec<K: Managed>(api: &Api<K>, mr: &mut K) -> Result<(), ControllerError> {
    let patch = spec_patch(mr)?;
    let patched = api
        .patch(&mr.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    mr.meta_mut().resource_version = patched.resource_version();
    debug!("Patched spec of {}", object_key(mr));
    Ok(())
}

async fn patch_status<K: Managed>(api: &Api<K>, mr: &K) -> Result<(), ControllerError> {
    let patch = status_patch(mr)?;
    api.patch_status(&mr.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

/// Record a failed reconcile as Synced=False; failures here are only logged
async fn record_error<K: Managed>(api: &Api<K>, mr: &K, error: &ControllerError) {
    let mut failed = mr.clone();
    failed.set_conditions([Condition::reconcile_error(error.to_string())]);
    let result = match status_patch(&failed) {
        Ok(patch) => api
            .patch_status(&failed.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map(|_| ())
            .map_err(ControllerError::from),
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!("Cannot record error on {}: {}", object_key(mr), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::network;
    use crds::{EXTERNAL_NAME_ANNOTATION, NetworkParameters};

    #[test]
    fn test_finalizer_is_added_once_and_removed() {
        let mut mr = network("vpc", NetworkParameters::default());
        mr.meta_mut().finalizers = Some(vec!["other".to_string()]);
        assert!(!has_finalizer(&mr));

        let added = with_finalizer(&mr);
        assert_eq!(added, vec!["other".to_string(), FINALIZER.to_string()]);
        mr.meta_mut().finalizers = Some(added);
        assert!(has_finalizer(&mr));
        assert_eq!(with_finalizer(&mr).len(), 2);
        assert_eq!(without_finalizer(&mr), vec!["other".to_string()]);
    }

    #[test]
    fn test_external_name_initialized_from_object_name() {
        let mut mr = crds::Network::new(
            "vpc",
            crds::NetworkSpec {
                resource_spec: Default::default(),
                for_provider: NetworkParameters::default(),
            },
        );
        assert!(initialize_external_name(&mut mr));
        assert_eq!(mr.external_name(), Some("vpc"));
        assert!(!initialize_external_name(&mut mr));
    }

    #[test]
    fn test_provider_assigned_external_name_is_left_unset() {
        let mut mr = crds::SecretVersion::new(
            "v1",
            crds::SecretVersionSpec {
                resource_spec: Default::default(),
                for_provider: Default::default(),
            },
        );
        assert!(!initialize_external_name(&mut mr));
        assert!(mr.external_name().is_none());
    }

    #[test]
    fn test_spec_patch_carries_resource_version() {
        let mut mr = network(
            "vpc",
            NetworkParameters {
                auto_create_subnetworks: Some(false),
                ..Default::default()
            },
        );
        mr.meta_mut().resource_version = Some("42".to_string());

        let patch = spec_patch(&mr).unwrap();
        assert_eq!(patch["metadata"]["resourceVersion"], "42");
        assert_eq!(patch["metadata"]["annotations"][EXTERNAL_NAME_ANNOTATION], "vpc");
        assert_eq!(patch["spec"]["forProvider"]["autoCreateSubnetworks"], false);
        assert!(patch.get("status").is_none());
    }

    #[test]
    fn test_status_patch_holds_conditions() {
        let mut mr = network("vpc", NetworkParameters::default());
        mr.set_conditions([Condition::reconcile_error("cannot create Network: boom")]);

        let patch = status_patch(&mr).unwrap();
        assert_eq!(patch["status"]["conditions"][0]["type"], "Synced");
        assert_eq!(patch["status"]["conditions"][0]["message"], "cannot create Network: boom");
        assert!(patch.get("spec").is_none());
    }

    #[test]
    fn test_object_key() {
        assert_eq!(object_key(&network("vpc", NetworkParameters::default())), "Network/vpc");
    }
}
