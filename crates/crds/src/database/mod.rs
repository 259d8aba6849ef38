//! Cloud SQL resources (database.gcp.crossplane.io)

pub mod cloudsql_instance;

pub use cloudsql_instance::*;
