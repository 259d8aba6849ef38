//! Cloud SQL Admin v1beta4

use super::{GcpClient, body};
use crate::common::segment;
use crate::error::GcpError;
use crate::gcp_trait::SqlAdminApi;
use crate::models::*;
use tracing::debug;

impl GcpClient {
    fn instances_url(&self, project: &str) -> String {
        format!("{}/projects/{}/instances", self.endpoints.sqladmin, segment(project))
    }
}

#[async_trait::async_trait]
impl SqlAdminApi for GcpClient {
    async fn get_instance(&self, project: &str, name: &str) -> Result<DatabaseInstance, GcpError> {
        let url = format!("{}/{}", self.instances_url(project), segment(name));
        self.http.get(&url).await
    }

    async fn insert_instance(&self, project: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError> {
        debug!("Inserting Cloud SQL instance {} in project {}", instance.name, project);
        self.http.post(&self.instances_url(project), &body(instance)?).await
    }

    async fn patch_instance(&self, project: &str, name: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.instances_url(project), segment(name));
        self.http.patch(&url, &body(instance)?).await
    }

    async fn delete_instance(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.instances_url(project), segment(name));
        self.http.delete(&url).await
    }
}
