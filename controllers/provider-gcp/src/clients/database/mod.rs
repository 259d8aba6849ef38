//! Cloud SQL translation

pub mod cloudsql;
