//! GCP Provider Controller
//!
//! Reconciles GCP managed resources declared as Kubernetes custom resources:
//! - Compute: Network, Subnetwork, Firewall, Address, GlobalAddress
//! - Cloud SQL: CloudSQLInstance
//! - KMS: KeyRing, CryptoKey, CryptoKeyPolicy
//! - IAM: ServiceAccount
//! - Pub/Sub: Topic, Subscription
//! - Secret Manager: Secret, SecretVersion
//!
//! Each resource names a ProviderConfig holding the GCP project and
//! credentials to act with.

mod backoff;
mod clients;
mod config;
mod controller;
mod error;
mod external;
mod managed;
mod metrics;
mod providerconfig;
mod reference;
mod server;
#[cfg(test)]
mod test_utils;
mod watcher;

use crate::config::Config;
use crate::error::ControllerError;
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting GCP Provider Controller");
    let config = Config::from_env()?;
    info!("Configuration:");
    info!("  Poll interval: {}s", config.poll_interval.as_secs());
    info!("  Concurrency per kind: {}", config.concurrency);
    info!("  Probes and metrics: {}", config.metrics_addr);
    if let Some(api_root) = &config.api_root {
        info!("  Google API root: {}", api_root);
    }

    let client = Client::try_default().await?;
    controller::run(client, config).await
}
