//! Google Cloud REST API Client
//!
//! A typed client for the Google Cloud services the provider manages:
//! Compute Engine v1, Cloud SQL Admin v1beta4, Cloud KMS v1, IAM v1,
//! Pub/Sub v1 and Secret Manager v1.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gcp_client::{ComputeApi, GcpClient, GcpCredentials};
//!
//! # async fn example() -> Result<(), gcp_client::GcpError> {
//! let credentials = GcpCredentials::application_default().await?;
//! let client = GcpClient::new(Arc::new(credentials))?;
//!
//! let network = client.get_network("my-project", "default").await?;
//! println!("{}", network.self_link);
//! # Ok(())
//! # }
//! ```
//!
//! # Wire model
//!
//! Models follow the Google API client conventions: scalar fields are plain
//! values whose zero value is omitted on the wire, unless listed in the
//! struct's `force_send_fields`. See [`common::wire`].

pub mod auth;
pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod gcp_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use auth::{GcpCredentials, StaticToken, TokenSource};
pub use client::GcpClient;
pub use common::{Endpoints, HttpClient};
pub use error::GcpError;
pub use models::*;
pub use gcp_trait::{ComputeApi, IamApi, KmsApi, PubSubApi, SecretManagerApi, SqlAdminApi};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockGcpClient;
