//! Controller-specific error types.
//!
//! Errors returned by a reconcile end up in the resource's `Synced`
//! condition, so their messages name the operation that failed.

use crate::reference::ReferenceError;
use gcp_client::GcpError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the GCP provider controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// GCP API error, wrapped with the operation that failed
    #[error("{context}: {source}")]
    Gcp {
        context: String,
        #[source]
        source: GcpError,
    },

    /// Invalid controller configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The resource spec cannot be acted on
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    /// Cross-resource reference could not be resolved
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Desired and observed state could not be compared
    #[error("cannot check whether {kind} is up to date: {source}")]
    UpToDate {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The external resource cannot be changed after creation
    #[error("{0} cannot be updated after creation")]
    Immutable(&'static str),

    /// ProviderConfig or its credentials are unusable
    #[error("cannot connect to GCP: {0}")]
    Connect(String),

    /// Object could not be encoded for a patch
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Probe listener error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

impl ControllerError {
    /// Wrap a GCP error with a static description of the failed call
    pub fn gcp(context: impl Into<String>) -> impl FnOnce(GcpError) -> Self {
        let context = context.into();
        move |source| Self::Gcp { context, source }
    }

    /// Wrap an up-to-date serialization failure with the resource kind
    pub fn up_to_date(kind: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::UpToDate { kind, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcp_error_carries_context() {
        let err = ControllerError::gcp("cannot create Network")(GcpError::Api {
            status: 500,
            message: "backend error".to_string(),
        });
        assert!(err.to_string().starts_with("cannot create Network: "));
        assert!(err.to_string().contains("backend error"));
    }

    #[test]
    fn test_immutable_message() {
        assert_eq!(
            ControllerError::Immutable("Address").to_string(),
            "Address cannot be updated after creation"
        );
    }
}
