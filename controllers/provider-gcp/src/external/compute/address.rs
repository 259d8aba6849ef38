//! Address and GlobalAddress external clients
//!
//! Reserved addresses cannot be modified; drift is reported as an error
//! rather than silently ignored. Readiness follows the address status.

use crate::clients::compute::address::{
    address_condition, generate_address, generate_address_observation, is_address_up_to_date, late_initialize_address,
};
use crate::clients::compute::global_address::{
    generate_global_address, generate_global_address_observation, is_global_address_up_to_date,
    late_initialize_global_address,
};
use crate::error::ControllerError;
use crate::external::{deleted, external_name, found};
use crate::managed::{Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup, late_initialize};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{Address, GlobalAddress, Managed};
use gcp_client::models::compute as gcp;

struct AddressExternal {
    conn: Connection,
}

impl Setup for Address {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(AddressExternal { conn })
    }
}

#[async_trait]
impl ExternalClient<Address> for AddressExternal {
    async fn observe(&self, mr: &mut Address) -> Result<ExternalObservation, ControllerError> {
        let name = external_name(mr)?;
        let region = mr.spec.for_provider.region.clone();
        let Some(observed) = found(
            self.conn.compute.get_address(&self.conn.project, &region, &name).await,
            "cannot get Address",
        )?
        else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_address(p, &observed));
        mr.set_at_provider(generate_address_observation(&observed));
        mr.set_conditions([address_condition(&observed.status)]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_address_up_to_date(&name, mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut Address) -> Result<ExternalCreation, ControllerError> {
        let name = external_name(mr)?;
        let params = mr.for_provider();
        let mut address = gcp::Address::default();
        generate_address(&name, params, &mut address);
        self.conn
            .compute
            .insert_address(&self.conn.project, &params.region, &address)
            .await
            .map_err(ControllerError::gcp("cannot create Address"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, _mr: &mut Address) -> Result<ExternalUpdate, ControllerError> {
        Err(ControllerError::Immutable("Address"))
    }

    async fn delete(&self, mr: &mut Address) -> Result<Deletion, ControllerError> {
        let name = external_name(mr)?;
        deleted(
            self.conn
                .compute
                .delete_address(&self.conn.project, &mr.spec.for_provider.region, &name)
                .await,
            "cannot delete Address",
        )?;
        Ok(Deletion::Pending)
    }
}

struct GlobalAddressExternal {
    conn: Connection,
}

impl Setup for GlobalAddress {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(GlobalAddressExternal { conn })
    }
}

#[async_trait]
impl ExternalClient<GlobalAddress> for GlobalAddressExternal {
    async fn observe(&self, mr: &mut GlobalAddress) -> Result<ExternalObservation, ControllerError> {
        let name = external_name(mr)?;
        let Some(observed) = found(
            self.conn.compute.get_global_address(&self.conn.project, &name).await,
            "cannot get GlobalAddress",
        )?
        else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_global_address(p, &observed));
        mr.set_at_provider(generate_global_address_observation(&observed));
        mr.set_conditions([address_condition(&observed.status)]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_global_address_up_to_date(&name, mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut GlobalAddress) -> Result<ExternalCreation, ControllerError> {
        let name = external_name(mr)?;
        let mut address = gcp::Address::default();
        generate_global_address(&name, mr.for_provider(), &mut address);
        self.conn
            .compute
            .insert_global_address(&self.conn.project, &address)
            .await
            .map_err(ControllerError::gcp("cannot create GlobalAddress"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, _mr: &mut GlobalAddress) -> Result<ExternalUpdate, ControllerError> {
        Err(ControllerError::Immutable("GlobalAddress"))
    }

    async fn delete(&self, mr: &mut GlobalAddress) -> Result<Deletion, ControllerError> {
        let name = external_name(mr)?;
        deleted(
            self.conn.compute.delete_global_address(&self.conn.project, &name).await,
            "cannot delete GlobalAddress",
        )?;
        Ok(Deletion::Pending)
    }
}
