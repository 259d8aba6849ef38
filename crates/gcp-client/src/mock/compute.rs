//! Compute operations for MockGcpClient

use super::{MockGcpClient, done, get_or_not_found, insert_new, lock, merge, now, remove_or_not_found};
use crate::error::GcpError;
use crate::gcp_trait::ComputeApi;
use crate::models::*;

const COMPUTE_BASE: &str = "https://www.googleapis.com/compute/v1";

fn global_link(project: &str, collection: &str, name: &str) -> String {
    format!("{COMPUTE_BASE}/projects/{project}/global/{collection}/{name}")
}

fn regional_link(project: &str, region: &str, collection: &str, name: &str) -> String {
    format!("{COMPUTE_BASE}/projects/{project}/regions/{region}/{collection}/{name}")
}

#[async_trait::async_trait]
impl ComputeApi for MockGcpClient {
    async fn get_network(&self, project: &str, name: &str) -> Result<Network, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("get_network", &key)?;
        get_or_not_found(&self.networks, &key, "network")
    }

    async fn insert_network(&self, project: &str, network: &Network) -> Result<Operation, GcpError> {
        let key = format!("{project}/{}", network.name);
        self.begin("insert_network", &key)?;
        let id = self.next_id();
        let link = global_link(project, "networks", &network.name);
        let stored = Network {
            id,
            self_link: link.clone(),
            creation_timestamp: now(),
            force_send_fields: Vec::new(),
            ..network.clone()
        };
        insert_new(&self.networks, &key, "network", stored)?;
        Ok(done("insert", &link, id))
    }

    async fn patch_network(&self, project: &str, name: &str, network: &Network) -> Result<Operation, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("patch_network", &key)?;
        let existing = get_or_not_found(&self.networks, &key, "network")?;
        let patched = merge(&existing, network)?;
        lock(&self.networks).insert(key, patched);
        Ok(done("patch", &existing.self_link, self.next_id()))
    }

    async fn switch_network_to_custom_mode(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("switch_network_to_custom_mode", &key)?;
        let mut networks = lock(&self.networks);
        let network = networks
            .get_mut(&key)
            .ok_or_else(|| GcpError::NotFound(format!("network {key} not found")))?;
        network.auto_create_subnetworks = false;
        Ok(done("switchToCustomMode", &network.self_link, self.next_id()))
    }

    async fn delete_network(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("delete_network", &key)?;
        let removed = remove_or_not_found(&self.networks, &key, "network")?;
        Ok(done("delete", &removed.self_link, self.next_id()))
    }

    async fn get_subnetwork(&self, project: &str, region: &str, name: &str) -> Result<Subnetwork, GcpError> {
        let key = format!("{project}/{region}/{name}");
        self.begin("get_subnetwork", &key)?;
        get_or_not_found(&self.subnetworks, &key, "subnetwork")
    }

    async fn insert_subnetwork(&self, project: &str, region: &str, subnetwork: &Subnetwork) -> Result<Operation, GcpError> {
        let key = format!("{project}/{region}/{}", subnetwork.name);
        self.begin("insert_subnetwork", &key)?;
        let id = self.next_id();
        let link = regional_link(project, region, "subnetworks", &subnetwork.name);
        let stored = Subnetwork {
            id,
            self_link: link.clone(),
            region: format!("{COMPUTE_BASE}/projects/{project}/regions/{region}"),
            creation_timestamp: now(),
            fingerprint: format!("fp-{id}"),
            force_send_fields: Vec::new(),
            ..subnetwork.clone()
        };
        insert_new(&self.subnetworks, &key, "subnetwork", stored)?;
        Ok(done("insert", &link, id))
    }

    async fn patch_subnetwork(&self, project: &str, region: &str, name: &str, subnetwork: &Subnetwork) -> Result<Operation, GcpError> {
        let key = format!("{project}/{region}/{name}");
        self.begin("patch_subnetwork", &key)?;
        let existing = get_or_not_found(&self.subnetworks, &key, "subnetwork")?;
        if subnetwork.fingerprint != existing.fingerprint {
            return Err(GcpError::Api {
                status: 412,
                message: format!("fingerprint of subnetwork {key} does not match"),
            });
        }
        let mut patched = merge(&existing, subnetwork)?;
        patched.fingerprint = format!("fp-{}", self.next_id());
        lock(&self.subnetworks).insert(key, patched);
        Ok(done("patch", &existing.self_link, self.next_id()))
    }

    async fn delete_subnetwork(&self, project: &str, region: &str, name: &str) -> Result<Operation, GcpError> {
        let key = format!("{project}/{region}/{name}");
        self.begin("delete_subnetwork", &key)?;
        let removed = remove_or_not_found(&self.subnetworks, &key, "subnetwork")?;
        Ok(done("delete", &removed.self_link, self.next_id()))
    }

    async fn get_firewall(&self, project: &str, name: &str) -> Result<Firewall, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("get_firewall", &key)?;
        get_or_not_found(&self.firewalls, &key, "firewall")
    }

    async fn insert_firewall(&self, project: &str, firewall: &Firewall) -> Result<Operation, GcpError> {
        let key = format!("{project}/{}", firewall.name);
        self.begin("insert_firewall", &key)?;
        let id = self.next_id();
        let link = global_link(project, "firewalls", &firewall.name);
        let stored = Firewall {
            id,
            self_link: link.clone(),
            creation_timestamp: now(),
            force_send_fields: Vec::new(),
            log_config: firewall.log_config.clone().map(|mut c| {
                c.force_send_fields.clear();
                c
            }),
            ..firewall.clone()
        };
        insert_new(&self.firewalls, &key, "firewall", stored)?;
        Ok(done("insert", &link, id))
    }

    async fn patch_firewall(&self, project: &str, name: &str, firewall: &Firewall) -> Result<Operation, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("patch_firewall", &key)?;
        let existing = get_or_not_found(&self.firewalls, &key, "firewall")?;
        let patched = merge(&existing, firewall)?;
        lock(&self.firewalls).insert(key, patched);
        Ok(done("patch", &existing.self_link, self.next_id()))
    }

    async fn delete_firewall(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("delete_firewall", &key)?;
        let removed = remove_or_not_found(&self.firewalls, &key, "firewall")?;
        Ok(done("delete", &removed.self_link, self.next_id()))
    }

    async fn get_address(&self, project: &str, region: &str, name: &str) -> Result<Address, GcpError> {
        let key = format!("{project}/{region}/{name}");
        self.begin("get_address", &key)?;
        get_or_not_found(&self.addresses, &key, "address")
    }

    async fn insert_address(&self, project: &str, region: &str, address: &Address) -> Result<Operation, GcpError> {
        let key = format!("{project}/{region}/{}", address.name);
        self.begin("insert_address", &key)?;
        let id = self.next_id();
        let link = regional_link(project, region, "addresses", &address.name);
        let stored = reserve(address, id, link.clone());
        insert_new(&self.addresses, &key, "address", stored)?;
        Ok(done("insert", &link, id))
    }

    async fn delete_address(&self, project: &str, region: &str, name: &str) -> Result<Operation, GcpError> {
        let key = format!("{project}/{region}/{name}");
        self.begin("delete_address", &key)?;
        let removed = remove_or_not_found(&self.addresses, &key, "address")?;
        Ok(done("delete", &removed.self_link, self.next_id()))
    }

    async fn get_global_address(&self, project: &str, name: &str) -> Result<Address, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("get_global_address", &key)?;
        get_or_not_found(&self.global_addresses, &key, "global address")
    }

    async fn insert_global_address(&self, project: &str, address: &Address) -> Result<Operation, GcpError> {
        let key = format!("{project}/{}", address.name);
        self.begin("insert_global_address", &key)?;
        let id = self.next_id();
        let link = global_link(project, "addresses", &address.name);
        let stored = reserve(address, id, link.clone());
        insert_new(&self.global_addresses, &key, "global address", stored)?;
        Ok(done("insert", &link, id))
    }

    async fn delete_global_address(&self, project: &str, name: &str) -> Result<Operation, GcpError> {
        let key = format!("{project}/{name}");
        self.begin("delete_global_address", &key)?;
        let removed = remove_or_not_found(&self.global_addresses, &key, "global address")?;
        Ok(done("delete", &removed.self_link, self.next_id()))
    }
}

/// Server-side view of a freshly reserved address
fn reserve(address: &Address, id: u64, self_link: String) -> Address {
    let mut stored = address.clone();
    stored.id = id;
    stored.self_link = self_link;
    stored.creation_timestamp = now();
    stored.status = "RESERVED".to_string();
    if stored.address.is_empty() {
        stored.address = format!("203.0.113.{}", id % 256);
    }
    if stored.address_type.is_empty() {
        stored.address_type = "EXTERNAL".to_string();
    }
    if stored.network_tier.is_empty() && stored.address_type == "EXTERNAL" {
        stored.network_tier = "PREMIUM".to_string();
    }
    stored
}
