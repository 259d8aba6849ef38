//! Topic translation

use crate::clients::{differing_fields, late_init_map, late_init_string};
use crate::error::ControllerError;
use crds::{MessageStoragePolicy, TopicObservation, TopicParameters};
use gcp_client::common::wire::equivalent;
use gcp_client::models::pubsub as gcp;

const MUTABLE_FIELDS: &[&str] = &["labels", "messageStoragePolicy", "messageRetentionDuration"];
const IMMUTABLE_FIELDS: &[&str] = &["kmsKeyName"];

/// `projects/{project}/topics/{topic_id}`
pub fn topic_name(project: &str, topic_id: &str) -> String {
    format!("projects/{project}/topics/{topic_id}")
}

/// Write `params` into `topic`; `name` is the full resource name
pub fn generate_topic(name: &str, params: &TopicParameters, topic: &mut gcp::Topic) {
    topic.name = name.to_string();
    topic.labels = params.labels.clone().unwrap_or_default();
    if let Some(policy) = &params.message_storage_policy {
        topic.message_storage_policy = Some(gcp::MessageStoragePolicy {
            allowed_persistence_regions: policy.allowed_persistence_regions.clone(),
        });
    }
    topic.kms_key_name = params.kms_key_name.clone().unwrap_or_default();
    topic.message_retention_duration = params.message_retention_duration.clone().unwrap_or_default();
}

pub fn generate_topic_observation(topic: &gcp::Topic) -> TopicObservation {
    TopicObservation {
        state: topic.state.clone(),
    }
}

pub fn late_initialize_topic(params: &mut TopicParameters, topic: &gcp::Topic) {
    late_init_map(&mut params.labels, &topic.labels);
    if params.message_storage_policy.is_none() {
        params.message_storage_policy = topic
            .message_storage_policy
            .as_ref()
            .filter(|p| !p.allowed_persistence_regions.is_empty())
            .map(|p| MessageStoragePolicy {
                allowed_persistence_regions: p.allowed_persistence_regions.clone(),
            });
    }
    late_init_string(&mut params.kms_key_name, &topic.kms_key_name);
    late_init_string(&mut params.message_retention_duration, &topic.message_retention_duration);
}

pub fn is_topic_up_to_date(name: &str, params: &TopicParameters, observed: &gcp::Topic) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_topic(name, params, &mut desired);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("Topic"))
}

/// Patch body and `updateMask` for the mutable fields that differ
///
/// Fails with `Immutable` when only fields fixed at creation differ.
pub fn generate_topic_update(
    name: &str,
    params: &TopicParameters,
    observed: &gcp::Topic,
) -> Result<(gcp::Topic, Vec<String>), ControllerError> {
    let mut desired = observed.clone();
    generate_topic(name, params, &mut desired);
    let mask = differing_fields(&desired, observed, MUTABLE_FIELDS).map_err(ControllerError::up_to_date("Topic"))?;
    if mask.is_empty()
        && !differing_fields(&desired, observed, IMMUTABLE_FIELDS)
            .map_err(ControllerError::up_to_date("Topic"))?
            .is_empty()
    {
        return Err(ControllerError::Immutable("Topic"));
    }
    Ok((desired, mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const NAME: &str = "projects/p/topics/orders";

    #[test]
    fn test_late_init_then_up_to_date() {
        let observed = gcp::Topic {
            name: NAME.to_string(),
            message_storage_policy: Some(gcp::MessageStoragePolicy {
                allowed_persistence_regions: vec!["europe-west1".to_string()],
            }),
            state: "ACTIVE".to_string(),
            ..Default::default()
        };
        let mut params = TopicParameters::default();
        late_initialize_topic(&mut params, &observed);

        assert_eq!(
            params.message_storage_policy.as_ref().map(|p| p.allowed_persistence_regions.len()),
            Some(1)
        );
        assert!(is_topic_up_to_date(NAME, &params, &observed).unwrap());
        assert_eq!(generate_topic_observation(&observed).state, "ACTIVE");
    }

    #[test]
    fn test_label_change_masks_labels_only() {
        let observed = gcp::Topic {
            name: NAME.to_string(),
            kms_key_name: "projects/p/locations/global/keyRings/r/cryptoKeys/k".to_string(),
            ..Default::default()
        };
        let params = TopicParameters {
            labels: Some(BTreeMap::from([("env".to_string(), "prod".to_string())])),
            kms_key_name: Some(observed.kms_key_name.clone()),
            ..Default::default()
        };
        let (topic, mask) = generate_topic_update(NAME, &params, &observed).unwrap();
        assert_eq!(mask, vec!["labels".to_string()]);
        assert_eq!(topic.labels["env"], "prod");
    }

    #[test]
    fn test_topic_name() {
        assert_eq!(topic_name("p", "orders"), NAME);
    }
}
