//! HTTP tests for GcpClient using wiremock
//!
//! These tests verify request paths, bodies and error mapping against a
//! mocked Google API root.

use gcp_client::{
    ComputeApi, Endpoints, Firewall, FirewallLogConfig, GcpClient, GcpError, KmsApi, Policy,
    PubSubApi, SecretManagerApi, StaticToken, Topic,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{bearer_token, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> GcpClient {
    GcpClient::with_endpoints(
        Arc::new(StaticToken("test-token".to_string())),
        Endpoints::with_root(&server.uri()),
    )
    .expect("client should build")
}

#[tokio::test]
async fn test_get_network_parses_uint64_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/compute/v1/projects/test-project/global/networks/default"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "default",
            "id": "5981281283491923",
            "autoCreateSubnetworks": true,
            "gatewayIPv4": "10.0.0.1",
            "selfLink": "https://www.googleapis.com/compute/v1/projects/test-project/global/networks/default"
        })))
        .mount(&server)
        .await;

    let network = client(&server).await.get_network("test-project", "default").await.unwrap();
    assert_eq!(network.id, 5981281283491923);
    assert!(network.auto_create_subnetworks);
    assert_eq!(network.gateway_ipv4, "10.0.0.1");
}

#[tokio::test]
async fn test_insert_firewall_sends_forced_zero_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compute/v1/projects/p/global/firewalls"))
        .and(body_json(json!({
            "name": "allow-ssh",
            "network": "global/networks/default",
            "priority": 0,
            "disabled": false,
            "logConfig": {"enable": false}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operation-1",
            "status": "RUNNING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let firewall = Firewall {
        name: "allow-ssh".to_string(),
        network: "global/networks/default".to_string(),
        log_config: Some(FirewallLogConfig {
            enable: false,
            force_send_fields: vec!["enable".to_string()],
        }),
        force_send_fields: vec!["priority".to_string(), "disabled".to_string()],
        ..Default::default()
    };
    let op = client(&server).await.insert_firewall("p", &firewall).await.unwrap();
    assert_eq!(op.status, "RUNNING");
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pubsub/v1/projects/p/topics/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Resource not found", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).await.get_topic("projects/p/topics/missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pubsub/v1/projects/p/topics/t"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "message": "Invalid credentials", "status": "UNAUTHENTICATED"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).await.get_topic("projects/p/topics/t").await.unwrap_err();
    assert!(matches!(err, GcpError::Authentication(m) if m == "Invalid credentials"));
}

#[tokio::test]
async fn test_patch_topic_wraps_body_and_mask() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/pubsub/v1/projects/p/topics/t"))
        .and(body_json(json!({
            "topic": {"name": "projects/p/topics/t", "labels": {"team": "a"}},
            "updateMask": "labels"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/p/topics/t",
            "labels": {"team": "a"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let topic = Topic {
        name: "projects/p/topics/t".to_string(),
        labels: [("team".to_string(), "a".to_string())].into(),
        ..Default::default()
    };
    let patched = client(&server)
        .await
        .patch_topic(&topic, &["labels".to_string()])
        .await
        .unwrap();
    assert_eq!(patched.labels.get("team").map(String::as_str), Some("a"));
}

#[tokio::test]
async fn test_set_iam_policy_sends_empty_bindings() {
    let server = MockServer::start().await;
    let key = "projects/p/locations/global/keyRings/r/cryptoKeys/k";
    Mock::given(method("POST"))
        .and(path(format!("/cloudkms/v1/{key}:setIamPolicy")))
        .and(body_json(json!({"policy": {"bindings": [], "etag": "BwXyz"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"etag": "BwNew"})))
        .expect(1)
        .mount(&server)
        .await;

    let policy = Policy {
        etag: "BwXyz".to_string(),
        ..Default::default()
    };
    let stored = client(&server).await.set_crypto_key_iam_policy(key, &policy).await.unwrap();
    assert_eq!(stored.etag, "BwNew");
}

#[tokio::test]
async fn test_access_secret_version_decodes_payload() {
    let server = MockServer::start().await;
    let version = "projects/p/secrets/s/versions/1";
    Mock::given(method("GET"))
        .and(path(format!("/secretmanager/v1/{version}:access")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": version,
            "payload": {"data": "aHVudGVyMg=="}
        })))
        .mount(&server)
        .await;

    let data = client(&server).await.access_secret_version(version).await.unwrap();
    assert_eq!(data, b"hunter2");
}

#[tokio::test]
async fn test_access_disabled_version_is_failed_precondition() {
    let server = MockServer::start().await;
    let version = "projects/p/secrets/s/versions/2";
    Mock::given(method("GET"))
        .and(path(format!("/secretmanager/v1/{version}:access")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "Secret Version is in DISABLED state.",
                "status": "FAILED_PRECONDITION"
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server).await.access_secret_version(version).await.unwrap_err();
    assert!(err.is_failed_precondition());
}

#[tokio::test]
async fn test_create_key_ring_passes_id_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cloudkms/v1/projects/p/locations/us/keyRings"))
        .and(query_param("keyRingId", "ring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/p/locations/us/keyRings/ring",
            "createTime": "2024-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ring = client(&server)
        .await
        .create_key_ring("projects/p/locations/us", "ring", &Default::default())
        .await
        .unwrap();
    assert_eq!(ring.name, "projects/p/locations/us/keyRings/ring");
}

#[tokio::test]
async fn test_delete_with_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/secretmanager/v1/projects/p/secrets/s"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).await.delete_secret("projects/p/secrets/s").await.unwrap();
}
