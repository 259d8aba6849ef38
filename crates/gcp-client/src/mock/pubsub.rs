//! Pub/Sub operations for MockGcpClient

use super::{MockGcpClient, get_or_not_found, insert_new, lock, merge, remove_or_not_found};
use crate::error::GcpError;
use crate::gcp_trait::PubSubApi;
use crate::models::*;

#[async_trait::async_trait]
impl PubSubApi for MockGcpClient {
    async fn get_topic(&self, name: &str) -> Result<Topic, GcpError> {
        self.begin("get_topic", name)?;
        get_or_not_found(&self.topics, name, "topic")
    }

    async fn create_topic(&self, topic: &Topic) -> Result<Topic, GcpError> {
        self.begin("create_topic", &topic.name)?;
        let stored = Topic {
            state: "ACTIVE".to_string(),
            ..topic.clone()
        };
        insert_new(&self.topics, &topic.name, "topic", stored)
    }

    async fn patch_topic(&self, topic: &Topic, update_mask: &[String]) -> Result<Topic, GcpError> {
        self.begin("patch_topic", &topic.name)?;
        if update_mask.is_empty() {
            return Err(GcpError::InvalidRequest("updateMask is required".to_string()));
        }
        let existing = get_or_not_found(&self.topics, &topic.name, "topic")?;
        let patched = merge(&existing, topic)?;
        lock(&self.topics).insert(topic.name.clone(), patched.clone());
        Ok(patched)
    }

    async fn delete_topic(&self, name: &str) -> Result<(), GcpError> {
        self.begin("delete_topic", name)?;
        remove_or_not_found(&self.topics, name, "topic").map(|_| ())
    }

    async fn get_subscription(&self, name: &str) -> Result<Subscription, GcpError> {
        self.begin("get_subscription", name)?;
        get_or_not_found(&self.subscriptions, name, "subscription")
    }

    async fn create_subscription(&self, subscription: &Subscription) -> Result<Subscription, GcpError> {
        self.begin("create_subscription", &subscription.name)?;
        if !lock(&self.topics).contains_key(&subscription.topic) {
            return Err(GcpError::NotFound(format!("topic {} not found", subscription.topic)));
        }
        let mut stored = subscription.clone();
        stored.state = "ACTIVE".to_string();
        if stored.ack_deadline_seconds == 0 {
            stored.ack_deadline_seconds = 10;
        }
        if stored.message_retention_duration.is_empty() {
            stored.message_retention_duration = "604800s".to_string();
        }
        insert_new(&self.subscriptions, &subscription.name, "subscription", stored)
    }

    async fn patch_subscription(&self, subscription: &Subscription, update_mask: &[String]) -> Result<Subscription, GcpError> {
        self.begin("patch_subscription", &subscription.name)?;
        if update_mask.is_empty() {
            return Err(GcpError::InvalidRequest("updateMask is required".to_string()));
        }
        let existing = get_or_not_found(&self.subscriptions, &subscription.name, "subscription")?;
        let patched = merge(&existing, subscription)?;
        lock(&self.subscriptions).insert(subscription.name.clone(), patched.clone());
        Ok(patched)
    }

    async fn delete_subscription(&self, name: &str) -> Result<(), GcpError> {
        self.begin("delete_subscription", name)?;
        remove_or_not_found(&self.subscriptions, name, "subscription").map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscription_requires_topic() {
        let mock = MockGcpClient::new();
        let subscription = Subscription {
            name: "projects/p/subscriptions/s".to_string(),
            topic: "projects/p/topics/t".to_string(),
            ..Default::default()
        };
        assert!(mock.create_subscription(&subscription).await.unwrap_err().is_not_found());

        mock.create_topic(&Topic {
            name: "projects/p/topics/t".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        let created = mock.create_subscription(&subscription).await.unwrap();
        assert_eq!(created.ack_deadline_seconds, 10);
        assert_eq!(created.state, "ACTIVE");
    }
}
