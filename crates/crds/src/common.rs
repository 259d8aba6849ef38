//! Fields shared by every managed resource
//!
//! Each managed resource's spec inlines `ResourceSpec` next to its
//! `forProvider` parameters, and its status inlines `ResourceStatus` next to
//! its `atProvider` observation. The `Managed` trait gives controllers uniform
//! access to both halves.

use crate::references::{Reference, SecretReference};
use chrono::{DateTime, Utc};
use kube::Resource;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Annotation holding the provider-side identifier of a managed resource
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Name of the ProviderConfig used when `providerConfigRef` is omitted
pub const DEFAULT_PROVIDER_CONFIG: &str = "default";

/// What happens to the external resource when the managed resource is deleted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum DeletionPolicy {
    /// Delete the external resource
    #[default]
    Delete,
    /// Leave the external resource in place
    Orphan,
}

/// Generic lifecycle fields of a managed resource spec
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    /// ProviderConfig supplying project and credentials (defaults to `default`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<Reference>,

    /// Deletion policy for the external resource
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,

    /// Secret to which connection details are written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_connection_secret_to_ref: Option<SecretReference>,
}

impl ResourceSpec {
    /// Name of the ProviderConfig this resource uses
    pub fn provider_config_name(&self) -> &str {
        self.provider_config_ref
            .as_ref()
            .map_or(DEFAULT_PROVIDER_CONFIG, |r| r.name.as_str())
    }
}

/// Condition type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionType {
    /// The external resource is usable
    Ready,
    /// The last reconcile succeeded
    Synced,
}

/// Condition status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// Condition holds
    True,
    /// Condition does not hold
    False,
    /// Not yet known
    Unknown,
}

/// Reason: the external resource is available for use
pub const REASON_AVAILABLE: &str = "Available";
/// Reason: the external resource is not available for use
pub const REASON_UNAVAILABLE: &str = "Unavailable";
/// Reason: the external resource is being created
pub const REASON_CREATING: &str = "Creating";
/// Reason: the external resource is being deleted
pub const REASON_DELETING: &str = "Deleting";
/// Reason: reconcile succeeded
pub const REASON_RECONCILE_SUCCESS: &str = "ReconcileSuccess";
/// Reason: reconcile failed
pub const REASON_RECONCILE_ERROR: &str = "ReconcileError";

/// A status condition of a managed resource
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type
    #[serde(rename = "type")]
    pub type_: ConditionType,

    /// Condition status
    pub status: ConditionStatus,

    /// Last time the status changed
    pub last_transition_time: DateTime<Utc>,

    /// Machine readable reason
    pub reason: String,

    /// Human readable detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    fn new(type_: ConditionType, status: ConditionStatus, reason: &str) -> Self {
        Self {
            type_,
            status,
            last_transition_time: Utc::now(),
            reason: reason.to_string(),
            message: None,
        }
    }

    /// Ready=True, the external resource can be used
    pub fn available() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::True, REASON_AVAILABLE)
    }

    /// Ready=False, the external resource exists but cannot be used
    pub fn unavailable() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, REASON_UNAVAILABLE)
    }

    /// Ready=False, creation is in progress
    pub fn creating() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, REASON_CREATING)
    }

    /// Ready=False, deletion is in progress
    pub fn deleting() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, REASON_DELETING)
    }

    /// Synced=True
    pub fn reconcile_success() -> Self {
        Self::new(ConditionType::Synced, ConditionStatus::True, REASON_RECONCILE_SUCCESS)
    }

    /// Synced=False with the error message
    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(ConditionType::Synced, ConditionStatus::False, REASON_RECONCILE_ERROR)
        }
    }

    /// Equal apart from the transition time
    pub fn equal(&self, other: &Self) -> bool {
        self.type_ == other.type_
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Generic status fields of a managed resource
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus {
    /// Current conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ResourceStatus {
    /// Condition of the given type, if recorded
    pub fn condition(&self, type_: ConditionType) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.type_ == type_)
    }

    /// Record conditions, one per type
    ///
    /// A condition equal to the recorded one keeps its transition time.
    pub fn set_conditions(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        for new in conditions {
            match self.conditions.iter_mut().find(|c| c.type_ == new.type_) {
                Some(existing) if existing.equal(&new) => {}
                Some(existing) => *existing = new,
                None => self.conditions.push(new),
            }
        }
    }

    /// Whether Ready=True is recorded
    pub fn is_ready(&self) -> bool {
        self.condition(ConditionType::Ready)
            .is_some_and(|c| c.status == ConditionStatus::True)
    }
}

/// Uniform access to a managed resource's spec and status halves
pub trait Managed:
    Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// User-declared desired state (`spec.forProvider`)
    type Parameters: Clone + Debug + PartialEq + Serialize + Send + Sync;
    /// Provider-reported state (`status.atProvider`)
    type Observation: Clone + Debug + Default + PartialEq + Serialize + Send + Sync;

    /// Generic spec fields
    fn resource_spec(&self) -> &ResourceSpec;
    /// Desired state
    fn for_provider(&self) -> &Self::Parameters;
    /// Desired state, mutable for late initialization and reference resolution
    fn for_provider_mut(&mut self) -> &mut Self::Parameters;
    /// Last observation, if any
    fn at_provider(&self) -> Option<&Self::Observation>;
    /// Replace the observation
    fn set_at_provider(&mut self, observation: Self::Observation);
    /// Generic status fields, if a status exists
    fn resource_status(&self) -> Option<&ResourceStatus>;
    /// Generic status fields, creating the status when absent
    fn resource_status_mut(&mut self) -> &mut ResourceStatus;

    /// Provider-side identifier from the external-name annotation
    fn external_name(&self) -> Option<&str> {
        self.meta()
            .annotations
            .as_ref()?
            .get(EXTERNAL_NAME_ANNOTATION)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }

    /// Set the external-name annotation
    fn set_external_name(&mut self, name: &str) {
        self.meta_mut()
            .annotations
            .get_or_insert_with(Default::default)
            .insert(EXTERNAL_NAME_ANNOTATION.to_string(), name.to_string());
    }

    /// Record conditions on the status
    fn set_conditions(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        self.resource_status_mut().set_conditions(conditions);
    }

    /// Whether the resource reports Ready=True
    fn is_ready(&self) -> bool {
        self.resource_status().is_some_and(ResourceStatus::is_ready)
    }
}

/// Implements `Managed` for a CRD whose spec has `resource_spec` and
/// `for_provider`, and whose status has `resource_status` and `at_provider`.
macro_rules! impl_managed {
    ($kind:ty, $status:ty, $params:ty, $observation:ty) => {
        impl $crate::common::Managed for $kind {
            type Parameters = $params;
            type Observation = $observation;

            fn resource_spec(&self) -> &$crate::common::ResourceSpec {
                &self.spec.resource_spec
            }

            fn for_provider(&self) -> &$params {
                &self.spec.for_provider
            }

            fn for_provider_mut(&mut self) -> &mut $params {
                &mut self.spec.for_provider
            }

            fn at_provider(&self) -> Option<&$observation> {
                self.status.as_ref().map(|s| &s.at_provider)
            }

            fn set_at_provider(&mut self, observation: $observation) {
                self.status.get_or_insert_with(<$status>::default).at_provider = observation;
            }

            fn resource_status(&self) -> Option<&$crate::common::ResourceStatus> {
                self.status.as_ref().map(|s| &s.resource_status)
            }

            fn resource_status_mut(&mut self) -> &mut $crate::common::ResourceStatus {
                &mut self.status.get_or_insert_with(<$status>::default).resource_status
            }
        }
    };
}

pub(crate) use impl_managed;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_conditions_keeps_transition_time_when_unchanged() {
        let mut status = ResourceStatus::default();
        let first = Condition::available();
        let recorded_at = first.last_transition_time;
        status.set_conditions([first]);

        let mut again = Condition::available();
        again.last_transition_time = recorded_at + chrono::Duration::seconds(30);
        status.set_conditions([again]);

        assert_eq!(status.conditions.len(), 1);
        assert_eq!(status.conditions[0].last_transition_time, recorded_at);
    }

    #[test]
    fn test_set_conditions_replaces_changed_condition() {
        let mut status = ResourceStatus::default();
        status.set_conditions([Condition::creating(), Condition::reconcile_success()]);
        status.set_conditions([Condition::available()]);

        assert_eq!(status.conditions.len(), 2);
        assert!(status.is_ready());
        assert_eq!(
            status.condition(ConditionType::Synced).map(|c| c.reason.as_str()),
            Some(REASON_RECONCILE_SUCCESS)
        );
    }

    #[test]
    fn test_reconcile_error_carries_message() {
        let c = Condition::reconcile_error("cannot create Network: boom");
        assert_eq!(c.status, ConditionStatus::False);
        assert_eq!(c.reason, REASON_RECONCILE_ERROR);
        assert_eq!(c.message.as_deref(), Some("cannot create Network: boom"));
    }

    #[test]
    fn test_provider_config_name_defaults() {
        let spec = ResourceSpec::default();
        assert_eq!(spec.provider_config_name(), "default");

        let spec = ResourceSpec {
            provider_config_ref: Some(Reference::new("team-a")),
            ..Default::default()
        };
        assert_eq!(spec.provider_config_name(), "team-a");
    }
}
