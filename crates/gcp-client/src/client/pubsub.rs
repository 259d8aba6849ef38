//! Pub/Sub v1

use super::{GcpClient, body, mask};
use crate::error::GcpError;
use crate::gcp_trait::PubSubApi;
use crate::models::*;
use serde_json::{Value, json};

impl GcpClient {
    fn pubsub_url(&self, name: &str) -> String {
        format!("{}/{}", self.endpoints.pubsub, name)
    }
}

#[async_trait::async_trait]
impl PubSubApi for GcpClient {
    async fn get_topic(&self, name: &str) -> Result<Topic, GcpError> {
        self.http.get(&self.pubsub_url(name)).await
    }

    async fn create_topic(&self, topic: &Topic) -> Result<Topic, GcpError> {
        self.http.put(&self.pubsub_url(&topic.name), &body(topic)?).await
    }

    async fn patch_topic(&self, topic: &Topic, update_mask: &[String]) -> Result<Topic, GcpError> {
        let request = json!({ "topic": body(topic)?, "updateMask": mask(update_mask) });
        self.http.patch(&self.pubsub_url(&topic.name), &request).await
    }

    async fn delete_topic(&self, name: &str) -> Result<(), GcpError> {
        self.http.delete::<Value>(&self.pubsub_url(name)).await?;
        Ok(())
    }

    async fn get_subscription(&self, name: &str) -> Result<Subscription, GcpError> {
        self.http.get(&self.pubsub_url(name)).await
    }

    async fn create_subscription(&self, subscription: &Subscription) -> Result<Subscription, GcpError> {
        self.http
            .put(&self.pubsub_url(&subscription.name), &body(subscription)?)
            .await
    }

    async fn patch_subscription(&self, subscription: &Subscription, update_mask: &[String]) -> Result<Subscription, GcpError> {
        let request = json!({
            "subscription": body(subscription)?,
            "updateMask": mask(update_mask),
        });
        self.http
            .patch(&self.pubsub_url(&subscription.name), &request)
            .await
    }

    async fn delete_subscription(&self, name: &str) -> Result<(), GcpError> {
        self.http.delete::<Value>(&self.pubsub_url(name)).await?;
        Ok(())
    }
}
