//! IAM v1 models

use serde::{Deserialize, Serialize};

/// Service account
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceAccount {
    pub name: String,
    pub project_id: String,
    pub unique_id: String,
    pub email: String,
    pub display_name: String,
    pub description: String,
    pub etag: String,
    #[serde(rename = "oauth2ClientId")]
    pub oauth2_client_id: String,
    pub disabled: bool,
}
