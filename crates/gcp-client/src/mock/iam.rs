//! IAM operations for MockGcpClient

use super::{MockGcpClient, get_or_not_found, insert_new, lock, merge, remove_or_not_found};
use crate::error::GcpError;
use crate::gcp_trait::IamApi;
use crate::models::*;

#[async_trait::async_trait]
impl IamApi for MockGcpClient {
    async fn get_service_account(&self, name: &str) -> Result<ServiceAccount, GcpError> {
        self.begin("get_service_account", name)?;
        get_or_not_found(&self.service_accounts, name, "service account")
    }

    async fn create_service_account(&self, project: &str, account_id: &str, account: &ServiceAccount) -> Result<ServiceAccount, GcpError> {
        let email = format!("{account_id}@{project}.iam.gserviceaccount.com");
        let name = format!("projects/{project}/serviceAccounts/{email}");
        self.begin("create_service_account", &name)?;
        let id = self.next_id();
        let stored = ServiceAccount {
            name: name.clone(),
            project_id: project.to_string(),
            unique_id: format!("1000000000000000{id:05}"),
            oauth2_client_id: format!("1000000000000000{id:05}"),
            email,
            etag: format!("etag-{id}"),
            ..account.clone()
        };
        insert_new(&self.service_accounts, &name, "service account", stored)
    }

    async fn patch_service_account(&self, name: &str, account: &ServiceAccount, update_mask: &[String]) -> Result<ServiceAccount, GcpError> {
        self.begin("patch_service_account", name)?;
        if update_mask.is_empty() {
            return Err(GcpError::InvalidRequest("updateMask is required".to_string()));
        }
        let existing = get_or_not_found(&self.service_accounts, name, "service account")?;
        let mut patched = merge(&existing, account)?;
        // Cleared fields only reach the API through the mask.
        for field in update_mask {
            match field.as_str() {
                "displayName" => patched.display_name = account.display_name.clone(),
                "description" => patched.description = account.description.clone(),
                _ => {}
            }
        }
        lock(&self.service_accounts).insert(name.to_string(), patched.clone());
        Ok(patched)
    }

    async fn delete_service_account(&self, name: &str) -> Result<(), GcpError> {
        self.begin("delete_service_account", name)?;
        remove_or_not_found(&self.service_accounts, name, "service account").map(|_| ())
    }
}
