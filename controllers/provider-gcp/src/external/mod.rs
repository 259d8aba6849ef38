//! External clients for each managed kind
//!
//! Organized by Google API:
//! - `compute`: Network, Subnetwork, Firewall, Address, GlobalAddress
//! - `database`: CloudSQLInstance
//! - `kms`: KeyRing, CryptoKey, CryptoKeyPolicy
//! - `iam`: ServiceAccount
//! - `pubsub`: Topic, Subscription
//! - `secretsmanager`: Secret, SecretVersion
//!
//! Each kind pairs an `ExternalClient` with a `Setup` impl. Observing writes
//! `atProvider`, late-initialized parameters and the Ready condition onto the
//! object; the runtime decides whether to create or update.

pub mod compute;
pub mod database;
pub mod iam;
pub mod kms;
pub mod pubsub;
pub mod secretsmanager;

use crate::error::ControllerError;
use crds::Managed;
use gcp_client::GcpError;
use kube::ResourceExt;

/// External name of `mr`, which the runtime sets before any external call
pub(crate) fn external_name<K: Managed>(mr: &K) -> Result<String, ControllerError> {
    mr.external_name().map(str::to_string).ok_or_else(|| {
        ControllerError::InvalidSpec(format!("{} {} has no external name", K::kind(&()), mr.name_any()))
    })
}

/// Treat NotFound as an absent resource
pub(crate) fn found<T>(result: Result<T, GcpError>, context: &'static str) -> Result<Option<T>, ControllerError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(ControllerError::gcp(context)(e)),
    }
}

/// Treat NotFound as already deleted
pub(crate) fn deleted<T>(result: Result<T, GcpError>, context: &'static str) -> Result<(), ControllerError> {
    found(result, context).map(|_| ())
}

/// A required parameter that a reference may not have resolved yet
pub(crate) fn required<'a, K: Managed>(mr: &K, value: Option<&'a String>, field: &str) -> Result<&'a str, ControllerError> {
    value
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ControllerError::InvalidSpec(format!("{} {}: {field} is required", K::kind(&()), mr.name_any())))
}
