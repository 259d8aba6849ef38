//! Controller bootstrap.
//!
//! Builds the shared reconcile `Context`, checks that the provider's CRDs are
//! installed, then runs one watcher per managed kind next to the probe and
//! metrics server. The first task to finish stops the others.

use crate::backoff::BackoffTable;
use crate::config::Config;
use crate::error::ControllerError;
use crate::managed::Setup;
use crate::managed::secret_store::{KubeSecretStore, SecretStore};
use crate::metrics::Metrics;
use crate::providerconfig::Connector;
use crate::reference::{KubeObjectReader, ObjectReader};
use crate::server;
use crate::watcher::watch_resource;
use crds::{
    Address, CloudSQLInstance, CryptoKey, CryptoKeyPolicy, Firewall, GlobalAddress, KINDS, KeyRing, Network, Secret,
    SecretVersion, ServiceAccount, Subnetwork, Subscription, Topic,
};
use futures::future::select_all;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// State shared by every reconcile
pub struct Context {
    /// Kubernetes client
    pub client: Client,
    /// Builds GCP connections from ProviderConfigs
    pub connector: Connector,
    /// Connection secret access
    pub secrets: Arc<dyn SecretStore>,
    /// Reads referenced objects
    pub reader: Arc<dyn ObjectReader>,
    pub metrics: Metrics,
    /// Per-object error backoff
    pub backoff: BackoffTable,
    pub config: Config,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("connector", &self.connector)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Context over the Kubernetes API
    pub fn new(client: Client, config: Config) -> Result<Self, ControllerError> {
        let secrets: Arc<dyn SecretStore> = Arc::new(KubeSecretStore::new(client.clone()));
        let reader: Arc<dyn ObjectReader> = Arc::new(KubeObjectReader::new(client.clone()));
        let connector = Connector::new(Arc::clone(&reader), Arc::clone(&secrets), config.api_root.clone());
        Ok(Self {
            client,
            connector,
            secrets,
            reader,
            metrics: Metrics::new()?,
            backoff: BackoffTable::new(config.backoff_min, config.backoff_max),
            config,
        })
    }
}

type Task = JoinHandle<Result<(), ControllerError>>;

fn spawn_watcher<K: Setup>(ctx: &Arc<Context>) -> Task {
    tokio::spawn(watch_resource::<K>(Arc::clone(ctx)))
}

/// Warn about managed kinds whose CRD is not installed
///
/// Their watchers would only log list errors until the CRD appears.
async fn check_crds(client: &Client) {
    let api: Api<CustomResourceDefinition> = Api::all(client.clone());
    for kind in KINDS {
        let name = (kind.crd)().metadata.name.unwrap_or_default();
        match api.get_opt(&name).await {
            Ok(Some(_)) => {}
            Ok(None) => warn!("CRD {} is not installed; {} resources will not reconcile", name, kind.kind()),
            Err(e) => {
                warn!("Cannot check installed CRDs: {}", e);
                return;
            }
        }
    }
}

/// Run every watcher and the probe server until one of them stops
pub async fn run(client: Client, config: Config) -> Result<(), ControllerError> {
    check_crds(&client).await;
    let ctx = Arc::new(Context::new(client, config)?);

    let tasks: Vec<Task> = vec![
        // compute
        spawn_watcher::<Network>(&ctx),
        spawn_watcher::<Subnetwork>(&ctx),
        spawn_watcher::<Firewall>(&ctx),
        spawn_watcher::<Address>(&ctx),
        spawn_watcher::<GlobalAddress>(&ctx),
        // database
        spawn_watcher::<CloudSQLInstance>(&ctx),
        // kms
        spawn_watcher::<KeyRing>(&ctx),
        spawn_watcher::<CryptoKey>(&ctx),
        spawn_watcher::<CryptoKeyPolicy>(&ctx),
        // iam
        spawn_watcher::<ServiceAccount>(&ctx),
        // pubsub
        spawn_watcher::<Topic>(&ctx),
        spawn_watcher::<Subscription>(&ctx),
        // secretsmanager
        spawn_watcher::<Secret>(&ctx),
        spawn_watcher::<SecretVersion>(&ctx),
        tokio::spawn(server::serve(ctx.config.metrics_addr, ctx.metrics.clone())),
    ];
    info!("Watching {} managed kinds", KINDS.len());

    let (finished, _, remaining) = select_all(tasks).await;
    for task in remaining {
        task.abort();
    }
    match finished {
        Ok(result) => result,
        Err(e) => {
            error!("Controller task panicked: {}", e);
            Err(ControllerError::Watch(e.to_string()))
        }
    }
}
