//! GCP Authentication
//!
//! Access tokens come from a service account JSON key (read from a
//! Kubernetes Secret by the controller) or from the identity injected into
//! the pod (Application Default Credentials, workload identity, metadata
//! server). Tokens are cached until shortly before they expire.

use crate::error::GcpError;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Scope requested for every API call
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Refresh tokens this long before the assumed expiry
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Assumed token lifetime
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Source of bearer tokens for API requests
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    /// A valid access token
    async fn token(&self) -> Result<String, GcpError>;
}

/// GCP credentials with token caching
#[derive(Clone)]
pub struct GcpCredentials {
    provider: Arc<dyn TokenProvider>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl GcpCredentials {
    /// Credentials from a service account JSON key
    pub fn from_service_account_json(json: &str) -> Result<Self, GcpError> {
        let account = CustomServiceAccount::from_json(json)
            .map_err(|e| GcpError::Authentication(format!("invalid service account key: {e}")))?;
        Ok(Self::from_provider(Arc::new(account)))
    }

    /// Credentials injected into the environment (ADC, workload identity)
    pub async fn application_default() -> Result<Self, GcpError> {
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| GcpError::Authentication(format!("no injected identity available: {e}")))?;
        Ok(Self::from_provider(provider))
    }

    fn from_provider(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait::async_trait]
impl TokenSource for GcpCredentials {
    async fn token(&self) -> Result<String, GcpError> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| c.is_valid()) {
                return Ok(cached.token.clone());
            }
        }

        let token = self
            .provider
            .token(DEFAULT_SCOPES)
            .await
            .map_err(|e| GcpError::Authentication(format!("cannot get access token: {e}")))?;
        let token = token.as_str().to_string();

        *self.token_cache.write().await = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER,
        });
        debug!("Cached new GCP access token");

        Ok(token)
    }
}

/// A fixed token, for emulators and tests
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String, GcpError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let source = StaticToken("abc".to_string());
        assert_eq!(source.token().await.unwrap(), "abc");
    }

    #[test]
    fn test_invalid_service_account_json() {
        let err = GcpCredentials::from_service_account_json("{not json").err().unwrap();
        assert!(matches!(err, GcpError::Authentication(_)));
    }
}
