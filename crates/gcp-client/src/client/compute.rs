//! Compute Engine v1

use super::{GcpClient, body};
use crate::common::segment;
use crate::error::GcpError;
use crate::gcp_trait::ComputeApi;
use crate::models::*;
use tracing::debug;

impl GcpClient {
    fn global_url(&self, project: &str, collection: &str) -> String {
        format!(
            "{}/projects/{}/global/{}",
            self.endpoints.compute,
            segment(project),
            collection
        )
    }

    fn regional_url(&self, project: &str, region: &str, collection: &str) -> String {
        format!(
            "{}/projects/{}/regions/{}/{}",
            self.endpoints.compute,
            segment(project),
            segment(region),
            collection
        )
    }
}

#[async_trait::async_trait]
impl ComputeApi for GcpClient {
    async fn get_network(&self, project: &str, name: &str) -> Result<Network, GcpError> {
        let url = format!("{}/{}", self.global_url(project, "networks"), segment(name));
        self.http.get(&url).await
    }

    async fn insert_network(&self, project: &str, network: &Network) -> Result<Operation, GcpError> {
        debug!("Inserting network {} in project {}", network.name, project);
        self.http
            .post(&self.global_url(project, "networks"), &body(network)?)
            .await
    }

    async fn patch_network(&self, project: &str, name: &str, network: &Network) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.global_url(project, "networks"), segment(name));
        self.http.patch(&url, &body(network)?).await
    }

    async fn switch_network_to_custom_mode(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let url = format!(
            "{}/{}/switchToCustomMode",
            self.global_url(project, "networks"),
            segment(name)
        );
        self.http.post(&url, &serde_json::json!({})).await
    }

    async fn delete_network(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.global_url(project, "networks"), segment(name));
        self.http.delete(&url).await
    }

    async fn get_subnetwork(&self, project: &str, region: &str, name: &str) -> Result<Subnetwork, GcpError> {
        let url = format!("{}/{}", self.regional_url(project, region, "subnetworks"), segment(name));
        self.http.get(&url).await
    }

    async fn insert_subnetwork(&self, project: &str, region: &str, subnetwork: &Subnetwork) -> Result<Operation, GcpError> {
        debug!("Inserting subnetwork {} in {}/{}", subnetwork.name, project, region);
        self.http
            .post(&self.regional_url(project, region, "subnetworks"), &body(subnetwork)?)
            .await
    }

    async fn patch_subnetwork(&self, project: &str, region: &str, name: &str, subnetwork: &Subnetwork) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.regional_url(project, region, "subnetworks"), segment(name));
        self.http.patch(&url, &body(subnetwork)?).await
    }

    async fn delete_subnetwork(&self, project: &str, region: &str, name: &str) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.regional_url(project, region, "subnetworks"), segment(name));
        self.http.delete(&url).await
    }

    async fn get_firewall(&self, project: &str, name: &str) -> Result<Firewall, GcpError> {
        let url = format!("{}/{}", self.global_url(project, "firewalls"), segment(name));
        self.http.get(&url).await
    }

    async fn insert_firewall(&self, project: &str, firewall: &Firewall) -> Result<Operation, GcpError> {
        debug!("Inserting firewall {} in project {}", firewall.name, project);
        self.http
            .post(&self.global_url(project, "firewalls"), &body(firewall)?)
            .await
    }

    async fn patch_firewall(&self, project: &str, name: &str, firewall: &Firewall) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.global_url(project, "firewalls"), segment(name));
        self.http.patch(&url, &body(firewall)?).await
    }

    async fn delete_firewall(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.global_url(project, "firewalls"), segment(name));
        self.http.delete(&url).await
    }

    async fn get_address(&self, project: &str, region: &str, name: &str) -> Result<Address, GcpError> {
        let url = format!("{}/{}", self.regional_url(project, region, "addresses"), segment(name));
        self.http.get(&url).await
    }

    async fn insert_address(&self, project: &str, region: &str, address: &Address) -> Result<Operation, GcpError> {
        debug!("Reserving address {} in {}/{}", address.name, project, region);
        self.http
            .post(&self.regional_url(project, region, "addresses"), &body(address)?)
            .await
    }

    async fn delete_address(&self, project: &str, region: &str, name: &str) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.regional_url(project, region, "addresses"), segment(name));
        self.http.delete(&url).await
    }

    async fn get_global_address(&self, project: &str, name: &str) -> Result<Address, GcpError> {
        let url = format!("{}/{}", self.global_url(project, "addresses"), segment(name));
        self.http.get(&url).await
    }

    async fn insert_global_address(&self, project: &str, address: &Address) -> Result<Operation, GcpError> {
        debug!("Reserving global address {} in project {}", address.name, project);
        self.http
            .post(&self.global_url(project, "addresses"), &body(address)?)
            .await
    }

    async fn delete_global_address(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let url = format!("{}/{}", self.global_url(project, "addresses"), segment(name));
        self.http.delete(&url).await
    }
}
