//! Cross-resource references for GCP managed resources
//!
//! Managed resources point at each other by name (`Reference`) or by label
//! query (`Selector`). Kubernetes Secrets are addressed with `SecretReference`
//! and `SecretKeySelector`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to another cluster-scoped managed resource by name
///
/// The kind is implied by the field holding the reference, e.g. `networkRef`
/// always names a `Network`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Name of the referenced object
    pub name: String,
}

impl Reference {
    /// Create a reference to the named object
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Selects a managed resource by labels
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    /// Labels the selected object must carry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_labels: Option<BTreeMap<String, String>>,

    /// Only select objects controlled by the same controller as the selecting object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_controller_ref: Option<bool>,
}

impl Selector {
    /// Label selector string in the form understood by the Kubernetes list API
    pub fn label_selector(&self) -> String {
        self.match_labels
            .iter()
            .flatten()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Reference to a Kubernetes Secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretReference {
    /// Name of the Secret
    pub name: String,

    /// Namespace of the Secret
    pub namespace: String,
}

/// Selects a single key of a Kubernetes Secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    /// Name of the Secret
    pub name: String,

    /// Namespace of the Secret
    pub namespace: String,

    /// Key within the Secret's data
    pub key: String,
}

impl SecretKeySelector {
    /// The Secret this selector reads from
    pub fn secret_reference(&self) -> SecretReference {
        SecretReference {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_selector_joins_sorted_labels() {
        let selector = Selector {
            match_labels: Some(BTreeMap::from([
                ("tier".to_string(), "db".to_string()),
                ("env".to_string(), "prod".to_string()),
            ])),
            match_controller_ref: None,
        };
        assert_eq!(selector.label_selector(), "env=prod,tier=db");
    }

    #[test]
    fn test_label_selector_empty() {
        assert_eq!(Selector::default().label_selector(), "");
    }
}
