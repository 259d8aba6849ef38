//! IAM translation

pub mod service_account;
