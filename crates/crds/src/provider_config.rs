//! ProviderConfig Custom Resource Definition
//!
//! Supplies the GCP project and the credentials every managed resource
//! controller connects with.

use crate::common::ResourceStatus;
use crate::references::SecretKeySelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ProviderConfigSpec configures how controllers reach GCP
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "gcp.crossplane.io",
    version = "v1beta1",
    kind = "ProviderConfig",
    status = "ProviderConfigStatus",
    derive = "PartialEq",
    category = "crossplane",
    category = "provider",
    category = "gcp",
    printcolumn = r#"{"name":"PROJECT-ID","type":"string","jsonPath":".spec.projectID"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigSpec {
    /// GCP project all resources using this config live in
    #[serde(rename = "projectID")]
    pub project_id: String,

    /// Where credentials come from
    pub credentials: ProviderCredentials,
}

/// Credentials configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentials {
    /// Credential source
    pub source: CredentialsSource,

    /// Secret key holding a service account JSON key (source `Secret`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretKeySelector>,
}

/// Credential source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum CredentialsSource {
    /// Service account key read from a Kubernetes Secret
    Secret,
    /// Identity injected into the controller pod (workload identity, ADC)
    InjectedIdentity,
}

/// ProviderConfigStatus reports whether the config is usable
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigStatus {
    /// Conditions
    #[serde(flatten)]
    pub resource_status: ResourceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    #[test]
    fn test_provider_config_wire_names() {
        let spec: ProviderConfigSpec = serde_json::from_value(serde_json::json!({
            "projectID": "my-project",
            "credentials": {
                "source": "Secret",
                "secretRef": {"namespace": "crossplane-system", "name": "gcp-creds", "key": "creds"}
            }
        }))
        .unwrap();
        assert_eq!(spec.project_id, "my-project");
        assert_eq!(spec.credentials.source, CredentialsSource::Secret);
        assert_eq!(spec.credentials.secret_ref.unwrap().key, "creds");
    }

    #[test]
    fn test_provider_config_is_cluster_scoped() {
        let crd = ProviderConfig::crd();
        assert_eq!(crd.spec.scope, "Cluster");
        assert_eq!(crd.spec.group, "gcp.crossplane.io");
    }
}
