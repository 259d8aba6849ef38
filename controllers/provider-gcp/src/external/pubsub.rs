//! Pub/Sub external clients
//!
//! Handles: Topic, Subscription

use crate::clients::pubsub::subscription::{
    generate_subscription, generate_subscription_observation, generate_subscription_update,
    is_subscription_up_to_date, late_initialize_subscription, subscription_name,
};
use crate::clients::pubsub::topic::{
    generate_topic, generate_topic_observation, generate_topic_update, is_topic_up_to_date, late_initialize_topic,
    topic_name,
};
use crate::error::ControllerError;
use crate::external::{deleted, external_name, found, required};
use crate::managed::{Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup, late_initialize};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{Condition, Managed, Subscription, Topic};
use gcp_client::models::pubsub as gcp;
use tracing::debug;

struct TopicExternal {
    conn: Connection,
}

impl Setup for Topic {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(TopicExternal { conn })
    }
}

impl TopicExternal {
    fn name(&self, mr: &Topic) -> Result<String, ControllerError> {
        Ok(topic_name(&self.conn.project, &external_name(mr)?))
    }

    async fn get(&self, name: &str) -> Result<Option<gcp::Topic>, ControllerError> {
        found(self.conn.pubsub.get_topic(name).await, "cannot get Topic")
    }
}

#[async_trait]
impl ExternalClient<Topic> for TopicExternal {
    async fn observe(&self, mr: &mut Topic) -> Result<ExternalObservation, ControllerError> {
        let name = self.name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_topic(p, &observed));
        mr.set_at_provider(generate_topic_observation(&observed));
        mr.set_conditions([Condition::available()]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_topic_up_to_date(&name, mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut Topic) -> Result<ExternalCreation, ControllerError> {
        let name = self.name(mr)?;
        let mut topic = gcp::Topic::default();
        generate_topic(&name, mr.for_provider(), &mut topic);
        self.conn
            .pubsub
            .create_topic(&topic)
            .await
            .map_err(ControllerError::gcp("cannot create Topic"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut Topic) -> Result<ExternalUpdate, ControllerError> {
        let name = self.name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalUpdate::default());
        };
        let (topic, mask) = generate_topic_update(&name, mr.for_provider(), &observed)?;
        if mask.is_empty() {
            return Ok(ExternalUpdate::default());
        }
        debug!("Patching Topic {} fields {:?}", name, mask);
        self.conn
            .pubsub
            .patch_topic(&topic, &mask)
            .await
            .map_err(ControllerError::gcp("cannot update Topic"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut Topic) -> Result<Deletion, ControllerError> {
        let name = self.name(mr)?;
        deleted(self.conn.pubsub.delete_topic(&name).await, "cannot delete Topic")?;
        Ok(Deletion::Complete)
    }
}

struct SubscriptionExternal {
    conn: Connection,
}

impl Setup for Subscription {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(SubscriptionExternal { conn })
    }
}

impl SubscriptionExternal {
    fn name(&self, mr: &Subscription) -> Result<String, ControllerError> {
        Ok(subscription_name(&self.conn.project, &external_name(mr)?))
    }

    async fn get(&self, name: &str) -> Result<Option<gcp::Subscription>, ControllerError> {
        found(self.conn.pubsub.get_subscription(name).await, "cannot get Subscription")
    }
}

#[async_trait]
impl ExternalClient<Subscription> for SubscriptionExternal {
    async fn observe(&self, mr: &mut Subscription) -> Result<ExternalObservation, ControllerError> {
        let name = self.name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_subscription(p, &observed));
        mr.set_at_provider(generate_subscription_observation(&observed));
        mr.set_conditions([Condition::available()]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_subscription_up_to_date(&self.conn.project, &name, mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut Subscription) -> Result<ExternalCreation, ControllerError> {
        let name = self.name(mr)?;
        required(mr, mr.spec.for_provider.topic.as_ref(), "spec.forProvider.topic")?;
        let mut subscription = gcp::Subscription::default();
        generate_subscription(&self.conn.project, &name, mr.for_provider(), &mut subscription);
        self.conn
            .pubsub
            .create_subscription(&subscription)
            .await
            .map_err(ControllerError::gcp("cannot create Subscription"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut Subscription) -> Result<ExternalUpdate, ControllerError> {
        let name = self.name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalUpdate::default());
        };
        let (subscription, mask) =
            generate_subscription_update(&self.conn.project, &name, mr.for_provider(), &observed)?;
        if mask.is_empty() {
            return Ok(ExternalUpdate::default());
        }
        debug!("Patching Subscription {} fields {:?}", name, mask);
        self.conn
            .pubsub
            .patch_subscription(&subscription, &mask)
            .await
            .map_err(ControllerError::gcp("cannot update Subscription"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut Subscription) -> Result<Deletion, ControllerError> {
        let name = self.name(mr)?;
        deleted(
            self.conn.pubsub.delete_subscription(&name).await,
            "cannot delete Subscription",
        )?;
        Ok(Deletion::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managed::sync_external;
    use crate::test_utils::{mock_connection, named};
    use crds::{SubscriptionParameters, SubscriptionSpec, TopicParameters, TopicSpec};
    use gcp_client::MockGcpClient;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const TOPIC: &str = "projects/test-project/topics/orders";
    const SUBSCRIPTION: &str = "projects/test-project/subscriptions/orders-worker";

    fn topic(params: TopicParameters) -> Topic {
        named(Topic::new(
            "orders",
            TopicSpec {
                resource_spec: Default::default(),
                for_provider: params,
            },
        ))
    }

    fn subscription(params: SubscriptionParameters) -> Subscription {
        named(Subscription::new(
            "orders-worker",
            SubscriptionSpec {
                resource_spec: Default::default(),
                for_provider: params,
            },
        ))
    }

    fn pull_from_orders() -> SubscriptionParameters {
        SubscriptionParameters {
            topic: Some("orders".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_topic_labels_are_patched_with_mask() {
        let mock = Arc::new(MockGcpClient::new());
        let client = Topic::external(mock_connection(&mock));
        let mut mr = topic(TopicParameters::default());

        sync_external(client.as_ref(), &mut mr).await.unwrap();
        assert!(client.observe(&mut mr).await.unwrap().resource_up_to_date);
        assert_eq!(mr.at_provider().unwrap().state, "ACTIVE");

        mr.spec.for_provider.labels = Some(BTreeMap::from([("env".to_string(), "prod".to_string())]));
        let outcome = sync_external(client.as_ref(), &mut mr).await.unwrap();
        assert!(!outcome.spec_changed);
        assert_eq!(mock.topic(TOPIC).unwrap().labels["env"], "prod");
    }

    #[tokio::test]
    async fn test_topic_kms_key_change_is_immutable() {
        let mock = Arc::new(MockGcpClient::new());
        let client = Topic::external(mock_connection(&mock));
        let mut mr = topic(TopicParameters {
            kms_key_name: Some("projects/p/locations/global/keyRings/r/cryptoKeys/a".to_string()),
            ..Default::default()
        });
        sync_external(client.as_ref(), &mut mr).await.unwrap();

        mr.spec.for_provider.kms_key_name = Some("projects/p/locations/global/keyRings/r/cryptoKeys/b".to_string());
        let err = sync_external(client.as_ref(), &mut mr).await.unwrap_err();
        assert!(matches!(err, ControllerError::Immutable("Topic")));
        assert!(!mock.called("patch_topic"));
    }

    #[tokio::test]
    async fn test_subscription_filter_change_is_immutable() {
        let mock = Arc::new(MockGcpClient::new());
        let conn = mock_connection(&mock);
        sync_external(Topic::external(conn.clone()).as_ref(), &mut topic(TopicParameters::default()))
            .await
            .unwrap();
        let client = Subscription::external(conn);
        let mut mr = subscription(pull_from_orders());
        sync_external(client.as_ref(), &mut mr).await.unwrap();
        sync_external(client.as_ref(), &mut mr).await.unwrap();

        mr.spec.for_provider.filter = Some("attributes.kind = \"a\"".to_string());
        mr.spec.for_provider.enable_message_ordering = Some(true);
        let err = sync_external(client.as_ref(), &mut mr).await.unwrap_err();
        assert!(matches!(err, ControllerError::Immutable("Subscription")));
        assert!(!mock.called("patch_subscription"));
    }

    #[tokio::test]
    async fn test_subscription_adopts_server_defaults() {
        let mock = Arc::new(MockGcpClient::new());
        let conn = mock_connection(&mock);
        sync_external(Topic::external(conn.clone()).as_ref(), &mut topic(TopicParameters::default()))
            .await
            .unwrap();
        let client = Subscription::external(conn);
        let mut mr = subscription(pull_from_orders());

        sync_external(client.as_ref(), &mut mr).await.unwrap();
        assert_eq!(mock.subscription(SUBSCRIPTION).unwrap().topic, TOPIC);

        let observation = client.observe(&mut mr).await.unwrap();
        assert!(observation.resource_late_initialized);
        assert!(observation.resource_up_to_date);
        assert_eq!(mr.spec.for_provider.ack_deadline_seconds, Some(10));
        assert_eq!(mr.spec.for_provider.message_retention_duration.as_deref(), Some("604800s"));
    }

    #[tokio::test]
    async fn test_subscription_ack_deadline_update() {
        let mock = Arc::new(MockGcpClient::new());
        let conn = mock_connection(&mock);
        sync_external(Topic::external(conn.clone()).as_ref(), &mut topic(TopicParameters::default()))
            .await
            .unwrap();
        let client = Subscription::external(conn);
        let mut mr = subscription(pull_from_orders());
        client.create(&mut mr).await.unwrap();
        client.observe(&mut mr).await.unwrap();

        mr.spec.for_provider.ack_deadline_seconds = Some(60);
        assert!(!client.observe(&mut mr).await.unwrap().resource_up_to_date);
        client.update(&mut mr).await.unwrap();
        assert_eq!(mock.subscription(SUBSCRIPTION).unwrap().ack_deadline_seconds, 60);

        assert_eq!(client.delete(&mut mr).await.unwrap(), Deletion::Complete);
        assert!(mock.subscription(SUBSCRIPTION).is_none());
    }

    #[tokio::test]
    async fn test_subscription_without_topic_is_rejected() {
        let mock = Arc::new(MockGcpClient::new());
        let client = Subscription::external(mock_connection(&mock));
        let mut mr = subscription(SubscriptionParameters::default());

        let err = client.create(&mut mr).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid spec: Subscription orders-worker: spec.forProvider.topic is required"
        );
        assert!(!mock.called("create_subscription"));
    }
}
