//! Firewall external client

use crate::clients::compute::firewall::{
    generate_firewall, generate_firewall_observation, is_firewall_up_to_date, late_initialize_firewall,
};
use crate::error::ControllerError;
use crate::external::{deleted, external_name, found};
use crate::managed::{Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup, late_initialize};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{Condition, Firewall, Managed};
use gcp_client::models::compute as gcp;

struct FirewallExternal {
    conn: Connection,
}

impl Setup for Firewall {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(FirewallExternal { conn })
    }
}

#[async_trait]
impl ExternalClient<Firewall> for FirewallExternal {
    async fn observe(&self, mr: &mut Firewall) -> Result<ExternalObservation, ControllerError> {
        let name = external_name(mr)?;
        let Some(observed) = found(
            self.conn.compute.get_firewall(&self.conn.project, &name).await,
            "cannot get Firewall",
        )?
        else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_firewall(p, &observed));
        mr.set_at_provider(generate_firewall_observation(&observed));
        mr.set_conditions([Condition::available()]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_firewall_up_to_date(&name, mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut Firewall) -> Result<ExternalCreation, ControllerError> {
        let name = external_name(mr)?;
        let mut firewall = gcp::Firewall::default();
        generate_firewall(&name, mr.for_provider(), &mut firewall);
        self.conn
            .compute
            .insert_firewall(&self.conn.project, &firewall)
            .await
            .map_err(ControllerError::gcp("cannot create Firewall"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut Firewall) -> Result<ExternalUpdate, ControllerError> {
        let name = external_name(mr)?;
        let mut firewall = gcp::Firewall::default();
        generate_firewall(&name, mr.for_provider(), &mut firewall);
        self.conn
            .compute
            .patch_firewall(&self.conn.project, &name, &firewall)
            .await
            .map_err(ControllerError::gcp("cannot update Firewall"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut Firewall) -> Result<Deletion, ControllerError> {
        let name = external_name(mr)?;
        deleted(
            self.conn.compute.delete_firewall(&self.conn.project, &name).await,
            "cannot delete Firewall",
        )?;
        Ok(Deletion::Pending)
    }
}
