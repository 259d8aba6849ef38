//! Secret Manager translation

pub mod secret;
pub mod secret_version;
