//! Network external client
//!
//! Turning off `autoCreateSubnetworks` on an auto mode network cannot be
//! patched; the network is switched to custom mode instead.

use crate::clients::compute::network::{
    generate_network, generate_network_observation, is_network_up_to_date, late_initialize_network,
};
use crate::error::ControllerError;
use crate::external::{deleted, external_name, found};
use crate::managed::{Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup, late_initialize};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{Condition, Managed, Network};
use gcp_client::models::compute as gcp;
use tracing::{debug, info};

struct NetworkExternal {
    conn: Connection,
}

impl Setup for Network {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(NetworkExternal { conn })
    }
}

impl NetworkExternal {
    async fn get(&self, name: &str) -> Result<Option<gcp::Network>, ControllerError> {
        found(
            self.conn.compute.get_network(&self.conn.project, name).await,
            "cannot get Network",
        )
    }
}

#[async_trait]
impl ExternalClient<Network> for NetworkExternal {
    async fn observe(&self, mr: &mut Network) -> Result<ExternalObservation, ControllerError> {
        let name = external_name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_network(p, &observed));
        mr.set_at_provider(generate_network_observation(&observed));
        mr.set_conditions([Condition::available()]);
        let (up_to_date, _) = is_network_up_to_date(&name, mr.for_provider(), &observed)?;

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut Network) -> Result<ExternalCreation, ControllerError> {
        let name = external_name(mr)?;
        let mut network = gcp::Network::default();
        generate_network(&name, mr.for_provider(), &mut network);
        let operation = self
            .conn
            .compute
            .insert_network(&self.conn.project, &network)
            .await
            .map_err(ControllerError::gcp("cannot create Network"))?;
        debug!("Network {} insert operation {}", name, operation.name);
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut Network) -> Result<ExternalUpdate, ControllerError> {
        let name = external_name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalUpdate::default());
        };
        let (_, switch_to_custom) = is_network_up_to_date(&name, mr.for_provider(), &observed)?;

        if switch_to_custom {
            info!("Switching Network {} to custom subnet mode", name);
            self.conn
                .compute
                .switch_network_to_custom_mode(&self.conn.project, &name)
                .await
                .map_err(ControllerError::gcp("cannot switch Network to custom mode"))?;
            return Ok(ExternalUpdate::default());
        }

        let mut network = gcp::Network::default();
        generate_network(&name, mr.for_provider(), &mut network);
        self.conn
            .compute
            .patch_network(&self.conn.project, &name, &network)
            .await
            .map_err(ControllerError::gcp("cannot update Network"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut Network) -> Result<Deletion, ControllerError> {
        let name = external_name(mr)?;
        deleted(
            self.conn.compute.delete_network(&self.conn.project, &name).await,
            "cannot delete Network",
        )?;
        Ok(Deletion::Pending)
    }
}
