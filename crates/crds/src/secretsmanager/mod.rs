//! Secret Manager resources (secretsmanager.gcp.crossplane.io)

pub mod secret;
pub mod secret_version;

pub use secret::*;
pub use secret_version::*;
