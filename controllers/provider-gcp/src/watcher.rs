//! Kubernetes resource watchers.
//!
//! Every managed kind is watched by the same generic `watch_resource()`,
//! which runs a `kube_runtime::Controller` over the kind's cluster-scoped
//! API. The controller handles reconnection, requeues and per-object
//! serialization; reconcile and error policy come from `managed::reconciler`.
//! Objects the controller reports as gone lose their backoff entry.

use crate::backoff::BackoffTable;
use crate::controller::Context;
use crate::error::ControllerError;
use crate::managed::Setup;
use crate::managed::reconciler::{error_policy, reconcile};
use futures::StreamExt;
use kube::Api;
use kube_runtime::controller::{Config as ControllerConfig, Error as RuntimeError};
use kube_runtime::{Controller, watcher};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Watch and reconcile every object of kind `K` until shutdown
pub async fn watch_resource<K: Setup>(ctx: Arc<Context>) -> Result<(), ControllerError> {
    let kind = K::kind(&()).to_string();
    info!("Starting {} watcher", kind);

    let api: Api<K> = Api::all(ctx.client.clone());
    // Debounce batches bursts of status updates into one reconcile.
    let controller_config = ControllerConfig::default()
        .debounce(ctx.config.debounce)
        .concurrency(ctx.config.concurrency);

    let shared = Arc::clone(&ctx);
    Controller::new(api, watcher::Config::default())
        .with_config(controller_config)
        .shutdown_on_signal()
        .run(reconcile::<K>, error_policy::<K>, ctx)
        .for_each(|res| {
            let kind = kind.as_str();
            let backoff = &shared.backoff;
            async move {
                match res {
                    Ok((obj, _)) => debug!("Reconciled {} {}", kind, obj.name),
                    Err(e) => {
                        if !forget_deleted(backoff, kind, &e) {
                            warn!("{} controller error: {}", kind, e);
                        }
                    }
                }
            }
        })
        .await;

    info!("{} watcher stopped", kind);
    Ok(())
}

/// Drop the backoff of an object that no longer exists
///
/// Returns whether `error` reported such an object.
fn forget_deleted(backoff: &BackoffTable, kind: &str, error: &RuntimeError<ControllerError, watcher::Error>) -> bool {
    let RuntimeError::ObjectNotFound(obj) = error else {
        return false;
    };
    debug!("{} {} is gone; dropping its backoff", kind, obj.name);
    backoff.reset(&format!("{}/{}", kind, obj.name));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crds::Network;
    use kube::core::{ApiResource, DynamicObject};
    use kube_runtime::reflector::ObjectRef;
    use std::time::Duration;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_deleted_object_loses_backoff() {
        let table = BackoffTable::new(secs(5), secs(300));
        table.next("Network/vpc");
        table.next("Network/vpc");
        table.next("Network/other");
        table.next("Network/other");

        let gone = ObjectRef::<DynamicObject>::new_with("vpc", ApiResource::erase::<Network>(&()));
        assert!(forget_deleted(&table, "Network", &RuntimeError::ObjectNotFound(gone)));

        assert_eq!(table.next("Network/vpc"), secs(5));
        assert_eq!(table.next("Network/other"), secs(10));
    }

    #[test]
    fn test_other_errors_keep_backoff() {
        let table = BackoffTable::new(secs(5), secs(300));
        table.next("Network/vpc");
        table.next("Network/vpc");

        let failed = ObjectRef::<DynamicObject>::new_with("vpc", ApiResource::erase::<Network>(&()));
        let error = RuntimeError::ReconcilerFailed(ControllerError::Immutable("Network"), failed);
        assert!(!forget_deleted(&table, "Network", &error));
        assert_eq!(table.next("Network/vpc"), secs(10));
    }
}
