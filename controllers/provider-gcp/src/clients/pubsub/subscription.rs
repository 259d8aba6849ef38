//! Subscription translation
//!
//! `topic` may be a bare topic id or a full `projects/.../topics/...` name.
//! `filter` and `enableMessageOrdering` are fixed at creation and never
//! part of an update mask.

use crate::clients::pubsub::topic::topic_name;
use crate::clients::{differing_fields, late_init_bool, late_init_i64, late_init_map, late_init_string};
use crate::error::ControllerError;
use crds::{
    DeadLetterPolicy, ExpirationPolicy, OidcToken, PushConfig, RetryPolicy, SubscriptionObservation,
    SubscriptionParameters,
};
use gcp_client::common::wire::equivalent;
use gcp_client::models::pubsub as gcp;

const MUTABLE_FIELDS: &[&str] = &[
    "ackDeadlineSeconds",
    "labels",
    "messageRetentionDuration",
    "retainAckedMessages",
    "expirationPolicy",
    "deadLetterPolicy",
    "pushConfig",
    "retryPolicy",
];
const IMMUTABLE_FIELDS: &[&str] = &["topic", "filter", "enableMessageOrdering"];

/// `projects/{project}/subscriptions/{subscription_id}`
pub fn subscription_name(project: &str, subscription_id: &str) -> String {
    format!("projects/{project}/subscriptions/{subscription_id}")
}

/// Full topic name for a bare id or an already qualified name
pub fn topic_path(project: &str, topic: &str) -> String {
    if topic.starts_with("projects/") {
        topic.to_string()
    } else {
        topic_name(project, topic)
    }
}

/// Write `params` into `subscription`; `name` is the full resource name
pub fn generate_subscription(
    project: &str,
    name: &str,
    params: &SubscriptionParameters,
    subscription: &mut gcp::Subscription,
) {
    subscription.name = name.to_string();
    subscription.topic = params
        .topic
        .as_deref()
        .map(|t| topic_path(project, t))
        .unwrap_or_default();
    subscription.ack_deadline_seconds = params.ack_deadline_seconds.unwrap_or_default();
    subscription.labels = params.labels.clone().unwrap_or_default();
    subscription.message_retention_duration = params.message_retention_duration.clone().unwrap_or_default();
    subscription.retain_acked_messages = params.retain_acked_messages.unwrap_or_default();
    subscription.enable_message_ordering = params.enable_message_ordering.unwrap_or_default();
    subscription.filter = params.filter.clone().unwrap_or_default();
    if let Some(ep) = &params.expiration_policy {
        subscription.expiration_policy = Some(gcp::ExpirationPolicy { ttl: ep.ttl.clone() });
    }
    if let Some(dl) = &params.dead_letter_policy {
        subscription.dead_letter_policy = Some(gcp::DeadLetterPolicy {
            dead_letter_topic: topic_path(project, &dl.dead_letter_topic),
            max_delivery_attempts: dl.max_delivery_attempts.unwrap_or_default(),
        });
    }
    if let Some(pc) = &params.push_config {
        subscription.push_config = Some(gcp::PushConfig {
            push_endpoint: pc.push_endpoint.clone(),
            attributes: pc.attributes.clone().unwrap_or_default(),
            oidc_token: pc.oidc_token.as_ref().map(|t| gcp::OidcToken {
                service_account_email: t.service_account_email.clone(),
                audience: t.audience.clone().unwrap_or_default(),
            }),
        });
    }
    if let Some(rp) = &params.retry_policy {
        subscription.retry_policy = Some(gcp::RetryPolicy {
            minimum_backoff: rp.minimum_backoff.clone().unwrap_or_default(),
            maximum_backoff: rp.maximum_backoff.clone().unwrap_or_default(),
        });
    }
}

pub fn generate_subscription_observation(subscription: &gcp::Subscription) -> SubscriptionObservation {
    SubscriptionObservation {
        state: subscription.state.clone(),
    }
}

pub fn late_initialize_subscription(params: &mut SubscriptionParameters, subscription: &gcp::Subscription) {
    late_init_string(&mut params.topic, &subscription.topic);
    late_init_i64(&mut params.ack_deadline_seconds, subscription.ack_deadline_seconds);
    late_init_map(&mut params.labels, &subscription.labels);
    late_init_string(&mut params.message_retention_duration, &subscription.message_retention_duration);
    late_init_bool(&mut params.retain_acked_messages, subscription.retain_acked_messages);
    late_init_bool(&mut params.enable_message_ordering, subscription.enable_message_ordering);
    late_init_string(&mut params.filter, &subscription.filter);
    if params.expiration_policy.is_none() {
        params.expiration_policy = subscription
            .expiration_policy
            .as_ref()
            .filter(|ep| !ep.ttl.is_empty())
            .map(|ep| ExpirationPolicy { ttl: ep.ttl.clone() });
    }
    if params.dead_letter_policy.is_none() {
        params.dead_letter_policy = subscription
            .dead_letter_policy
            .as_ref()
            .filter(|dl| !dl.dead_letter_topic.is_empty())
            .map(|dl| DeadLetterPolicy {
                dead_letter_topic: dl.dead_letter_topic.clone(),
                max_delivery_attempts: (dl.max_delivery_attempts != 0).then_some(dl.max_delivery_attempts),
            });
    }
    if params.push_config.is_none() {
        params.push_config = subscription
            .push_config
            .as_ref()
            .filter(|pc| !pc.push_endpoint.is_empty())
            .map(|pc| PushConfig {
                push_endpoint: pc.push_endpoint.clone(),
                attributes: (!pc.attributes.is_empty()).then(|| pc.attributes.clone()),
                oidc_token: pc.oidc_token.as_ref().map(|t| OidcToken {
                    service_account_email: t.service_account_email.clone(),
                    audience: (!t.audience.is_empty()).then(|| t.audience.clone()),
                }),
            });
    }
    if params.retry_policy.is_none() {
        params.retry_policy = subscription.retry_policy.as_ref().map(|rp| RetryPolicy {
            minimum_backoff: (!rp.minimum_backoff.is_empty()).then(|| rp.minimum_backoff.clone()),
            maximum_backoff: (!rp.maximum_backoff.is_empty()).then(|| rp.maximum_backoff.clone()),
        });
    }
}

pub fn is_subscription_up_to_date(
    project: &str,
    name: &str,
    params: &SubscriptionParameters,
    observed: &gcp::Subscription,
) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_subscription(project, name, params, &mut desired);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("Subscription"))
}

/// Patch body and `updateMask` for the mutable fields that differ
///
/// Fails with `Immutable` when only fields fixed at creation differ.
pub fn generate_subscription_update(
    project: &str,
    name: &str,
    params: &SubscriptionParameters,
    observed: &gcp::Subscription,
) -> Result<(gcp::Subscription, Vec<String>), ControllerError> {
    let mut desired = observed.clone();
    generate_subscription(project, name, params, &mut desired);
    let mask =
        differing_fields(&desired, observed, MUTABLE_FIELDS).map_err(ControllerError::up_to_date("Subscription"))?;
    if mask.is_empty()
        && !differing_fields(&desired, observed, IMMUTABLE_FIELDS)
            .map_err(ControllerError::up_to_date("Subscription"))?
            .is_empty()
    {
        return Err(ControllerError::Immutable("Subscription"));
    }
    Ok((desired, mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "projects/p/subscriptions/orders-worker";

    fn observed() -> gcp::Subscription {
        gcp::Subscription {
            name: NAME.to_string(),
            topic: "projects/p/topics/orders".to_string(),
            ack_deadline_seconds: 10,
            message_retention_duration: "604800s".to_string(),
            expiration_policy: Some(gcp::ExpirationPolicy {
                ttl: "2678400s".to_string(),
            }),
            state: "ACTIVE".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_bare_topic_is_qualified() {
        assert_eq!(topic_path("p", "orders"), "projects/p/topics/orders");
        assert_eq!(topic_path("p", "projects/q/topics/x"), "projects/q/topics/x");
    }

    #[test]
    fn test_late_init_then_up_to_date() {
        let mut params = SubscriptionParameters {
            topic: Some("orders".to_string()),
            ..Default::default()
        };
        late_initialize_subscription(&mut params, &observed());

        assert_eq!(params.ack_deadline_seconds, Some(10));
        assert_eq!(params.expiration_policy.as_ref().map(|e| e.ttl.as_str()), Some("2678400s"));
        assert!(params.retry_policy.is_none());
        assert!(is_subscription_up_to_date("p", NAME, &params, &observed()).unwrap());
    }

    #[test]
    fn test_update_mask_skips_immutable_fields() {
        let params = SubscriptionParameters {
            topic: Some("orders".to_string()),
            ack_deadline_seconds: Some(30),
            filter: Some("attributes.kind = \"a\"".to_string()),
            message_retention_duration: Some("604800s".to_string()),
            ..Default::default()
        };
        let (subscription, mask) = generate_subscription_update("p", NAME, &params, &observed()).unwrap();
        assert_eq!(mask, vec!["ackDeadlineSeconds".to_string()]);
        assert_eq!(subscription.ack_deadline_seconds, 30);
    }

    #[test]
    fn test_dead_letter_topic_is_qualified() {
        let params = SubscriptionParameters {
            topic: Some("orders".to_string()),
            dead_letter_policy: Some(DeadLetterPolicy {
                dead_letter_topic: "orders-dlq".to_string(),
                max_delivery_attempts: Some(5),
            }),
            ..Default::default()
        };
        let mut subscription = gcp::Subscription::default();
        generate_subscription("p", NAME, &params, &mut subscription);
        let dl = subscription.dead_letter_policy.unwrap();
        assert_eq!(dl.dead_letter_topic, "projects/p/topics/orders-dlq");
        assert_eq!(dl.max_delivery_attempts, 5);
        assert_eq!(generate_subscription_observation(&observed()).state, "ACTIVE");
    }
}
