//! Integration tests for the GCP client
//!
//! These tests require a real Google Cloud project.
//! Set GCP_PROJECT and GOOGLE_APPLICATION_CREDENTIALS to run.

use gcp_client::{ComputeApi, GcpClient, GcpCredentials, PubSubApi, Topic};
use std::sync::Arc;

async fn live_client() -> (GcpClient, String) {
    let project = std::env::var("GCP_PROJECT").expect("GCP_PROJECT environment variable must be set");
    let credentials = GcpCredentials::application_default()
        .await
        .expect("Failed to load application default credentials");
    let client = GcpClient::new(Arc::new(credentials)).expect("Failed to create client");
    (client, project)
}

#[tokio::test]
#[ignore] // Requires a GCP project
async fn test_get_default_network() {
    let (client, project) = live_client().await;

    let network = client
        .get_network(&project, "default")
        .await
        .expect("Failed to get default network");

    println!("default network: {}", network.self_link);
}

#[tokio::test]
#[ignore]
async fn test_topic_lifecycle() {
    let (client, project) = live_client().await;
    let name = format!("projects/{project}/topics/provider-gcp-it-{}", std::process::id());

    let topic = Topic {
        name: name.clone(),
        labels: [("created-by".to_string(), "integration-test".to_string())].into(),
        ..Default::default()
    };
    client.create_topic(&topic).await.expect("Failed to create topic");

    let fetched = client.get_topic(&name).await.expect("Failed to get topic");
    assert_eq!(fetched.labels.get("created-by").map(String::as_str), Some("integration-test"));

    client.delete_topic(&name).await.expect("Failed to delete topic");
    assert!(client.get_topic(&name).await.unwrap_err().is_not_found());
}
