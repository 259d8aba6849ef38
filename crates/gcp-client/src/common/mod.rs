//! Common utilities for the GCP API client
//!
//! Provides the authenticated HTTP wrapper, service endpoints and error
//! mapping shared by every service module.

pub mod wire;

use crate::auth::TokenSource;
use crate::error::GcpError;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum length of response bodies written to logs
const MAX_LOG_BODY_LENGTH: usize = 500;

/// Truncate and strip control characters from a response body before logging
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = match body.char_indices().nth(MAX_LOG_BODY_LENGTH) {
        Some((cut, _)) => format!("{}... [truncated, {} bytes total]", &body[..cut], body.len()),
        None => body.to_string(),
    };
    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Base URLs of the Google APIs the provider calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub compute: String,
    pub sqladmin: String,
    pub kms: String,
    pub iam: String,
    pub pubsub: String,
    pub secretmanager: String,
}

impl Endpoints {
    /// Public Google API endpoints
    pub fn google() -> Self {
        Self {
            compute: "https://compute.googleapis.com/compute/v1".to_string(),
            sqladmin: "https://sqladmin.googleapis.com/sql/v1beta4".to_string(),
            kms: "https://cloudkms.googleapis.com/v1".to_string(),
            iam: "https://iam.googleapis.com/v1".to_string(),
            pubsub: "https://pubsub.googleapis.com/v1".to_string(),
            secretmanager: "https://secretmanager.googleapis.com/v1".to_string(),
        }
    }

    /// All services under one root, e.g. an emulator or a test server
    pub fn with_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            compute: format!("{root}/compute/v1"),
            sqladmin: format!("{root}/sql/v1beta4"),
            kms: format!("{root}/cloudkms/v1"),
            iam: format!("{root}/iam/v1"),
            pubsub: format!("{root}/pubsub/v1"),
            secretmanager: format!("{root}/secretmanager/v1"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::google()
    }
}

/// Error envelope returned by Google APIs
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    code: u16,
    message: String,
    status: String,
}

/// Map a failed response onto a `GcpError`
pub fn map_error(status: StatusCode, body: &str) -> GcpError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error)
        .unwrap_or_default();
    let message = if detail.message.is_empty() {
        sanitize_for_log(body)
    } else {
        detail.message
    };

    match (status, detail.status.as_str()) {
        (StatusCode::NOT_FOUND, _) | (_, "NOT_FOUND") => GcpError::NotFound(message),
        (_, "FAILED_PRECONDITION") => GcpError::FailedPrecondition(message),
        (StatusCode::CONFLICT, _) | (_, "ALREADY_EXISTS") | (_, "ABORTED") => {
            GcpError::Conflict(message)
        }
        (StatusCode::UNAUTHORIZED, _) => GcpError::Authentication(message),
        _ => GcpError::Api {
            status: if detail.code == 0 { status.as_u16() } else { detail.code },
            message,
        },
    }
}

/// Append query parameters to a URL
pub fn with_query(url: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{query}")
    }
}

/// Encode a single path segment
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// HTTP client wrapper with bearer authentication
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    tokens: Arc<dyn TokenSource>,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, tokens: Arc<dyn TokenSource>) -> Self {
        Self { client, tokens }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, GcpError> {
        self.send(Method::GET, url, None).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T, GcpError> {
        self.send(Method::POST, url, Some(body)).await
    }

    /// Make a PATCH request
    pub async fn patch<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T, GcpError> {
        self.send(Method::PATCH, url, Some(body)).await
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T, GcpError> {
        self.send(Method::PUT, url, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<T, GcpError> {
        self.send(Method::DELETE, url, None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<T, GcpError> {
        debug!("{} {}", method, url);
        let token = self.tokens.token().await?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(token)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                warn!("{} {} failed: {} - {}", method, url, status, sanitize_for_log(&text));
            }
            return Err(map_error(status, &text));
        }

        // Empty bodies (204, `{}` from some deletes) decode as an empty object.
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }
}
