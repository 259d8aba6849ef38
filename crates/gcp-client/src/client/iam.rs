//! IAM v1

use super::{GcpClient, body, mask};
use crate::common::segment;
use crate::error::GcpError;
use crate::gcp_trait::IamApi;
use crate::models::*;
use serde_json::{Value, json};

#[async_trait::async_trait]
impl IamApi for GcpClient {
    async fn get_service_account(&self, name: &str) -> Result<ServiceAccount, GcpError> {
        self.http.get(&format!("{}/{}", self.endpoints.iam, name)).await
    }

    async fn create_service_account(&self, project: &str, account_id: &str, account: &ServiceAccount) -> Result<ServiceAccount, GcpError> {
        let url = format!("{}/projects/{}/serviceAccounts", self.endpoints.iam, segment(project));
        let request = json!({
            "accountId": account_id,
            "serviceAccount": body(account)?,
        });
        self.http.post(&url, &request).await
    }

    async fn patch_service_account(&self, name: &str, account: &ServiceAccount, update_mask: &[String]) -> Result<ServiceAccount, GcpError> {
        let request = json!({
            "serviceAccount": body(account)?,
            "updateMask": mask(update_mask),
        });
        self.http
            .patch(&format!("{}/{}", self.endpoints.iam, name), &request)
            .await
    }

    async fn delete_service_account(&self, name: &str) -> Result<(), GcpError> {
        self.http
            .delete::<Value>(&format!("{}/{}", self.endpoints.iam, name))
            .await?;
        Ok(())
    }
}
