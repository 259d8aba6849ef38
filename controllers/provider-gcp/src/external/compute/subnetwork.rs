//! Subnetwork external client

use crate::clients::compute::subnetwork::{
    generate_subnetwork, generate_subnetwork_observation, generate_subnetwork_update, is_subnetwork_up_to_date,
    late_initialize_subnetwork,
};
use crate::error::ControllerError;
use crate::external::{deleted, external_name, found};
use crate::managed::{Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup, late_initialize};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{Condition, Managed, Subnetwork};
use gcp_client::models::compute as gcp;

struct SubnetworkExternal {
    conn: Connection,
}

impl Setup for Subnetwork {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(SubnetworkExternal { conn })
    }
}

impl SubnetworkExternal {
    async fn get(&self, region: &str, name: &str) -> Result<Option<gcp::Subnetwork>, ControllerError> {
        found(
            self.conn.compute.get_subnetwork(&self.conn.project, region, name).await,
            "cannot get Subnetwork",
        )
    }
}

#[async_trait]
impl ExternalClient<Subnetwork> for SubnetworkExternal {
    async fn observe(&self, mr: &mut Subnetwork) -> Result<ExternalObservation, ControllerError> {
        let name = external_name(mr)?;
        let region = mr.spec.for_provider.region.clone();
        let Some(observed) = self.get(&region, &name).await? else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_subnetwork(p, &observed));
        mr.set_at_provider(generate_subnetwork_observation(&observed));
        mr.set_conditions([Condition::available()]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_subnetwork_up_to_date(&name, mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut Subnetwork) -> Result<ExternalCreation, ControllerError> {
        let name = external_name(mr)?;
        let params = mr.for_provider();
        let mut subnetwork = gcp::Subnetwork::default();
        generate_subnetwork(&name, params, &mut subnetwork);
        self.conn
            .compute
            .insert_subnetwork(&self.conn.project, &params.region, &subnetwork)
            .await
            .map_err(ControllerError::gcp("cannot create Subnetwork"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut Subnetwork) -> Result<ExternalUpdate, ControllerError> {
        let name = external_name(mr)?;
        let params = mr.for_provider();
        // Patches must carry the current fingerprint.
        let Some(observed) = self.get(&params.region, &name).await? else {
            return Ok(ExternalUpdate::default());
        };
        let subnetwork = generate_subnetwork_update(&name, params, &observed);
        self.conn
            .compute
            .patch_subnetwork(&self.conn.project, &params.region, &name, &subnetwork)
            .await
            .map_err(ControllerError::gcp("cannot update Subnetwork"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut Subnetwork) -> Result<Deletion, ControllerError> {
        let name = external_name(mr)?;
        deleted(
            self.conn
                .compute
                .delete_subnetwork(&self.conn.project, &mr.spec.for_provider.region, &name)
                .await,
            "cannot delete Subnetwork",
        )?;
        Ok(Deletion::Pending)
    }
}
