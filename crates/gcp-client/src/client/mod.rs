//! Google Cloud API client
//!
//! `GcpClient` implements every service trait over one authenticated HTTP
//! client. Request bodies go through `wire::to_wire` so zero values are
//! omitted the way Google's own clients omit them.

mod compute;
mod iam;
mod kms;
mod pubsub;
mod secretmanager;
mod sqladmin;

use crate::auth::TokenSource;
use crate::common::{Endpoints, HttpClient, wire};
use crate::error::GcpError;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Request timeout for every API call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Cloud API client
#[derive(Clone)]
pub struct GcpClient {
    http: HttpClient,
    endpoints: Endpoints,
}

impl GcpClient {
    /// Create a client for the public Google endpoints
    pub fn new(tokens: Arc<dyn TokenSource>) -> Result<Self, GcpError> {
        Self::with_endpoints(tokens, Endpoints::google())
    }

    /// Create a client for custom endpoints
    pub fn with_endpoints(tokens: Arc<dyn TokenSource>, endpoints: Endpoints) -> Result<Self, GcpError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("provider-gcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http: HttpClient::new(client, tokens),
            endpoints,
        })
    }

    /// Endpoints this client talks to
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// Serialize a request body
fn body<T: Serialize>(value: &T) -> Result<Value, GcpError> {
    Ok(wire::to_wire(value)?)
}

/// Comma-joined update mask
fn mask(fields: &[String]) -> String {
    fields.join(",")
}
