//! IAM external clients
//!
//! Handles: ServiceAccount

use crate::clients::iam::service_account::{
    generate_service_account, generate_service_account_observation, generate_service_account_update,
    is_service_account_up_to_date, late_initialize_service_account, service_account_name,
};
use crate::error::ControllerError;
use crate::external::{deleted, external_name, found};
use crate::managed::{Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup, late_initialize};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{Condition, Managed, ServiceAccount};
use gcp_client::models::iam as gcp;

struct ServiceAccountExternal {
    conn: Connection,
}

impl Setup for ServiceAccount {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(ServiceAccountExternal { conn })
    }
}

impl ServiceAccountExternal {
    fn name(&self, mr: &ServiceAccount) -> Result<String, ControllerError> {
        Ok(service_account_name(&self.conn.project, &external_name(mr)?))
    }

    async fn get(&self, name: &str) -> Result<Option<gcp::ServiceAccount>, ControllerError> {
        found(self.conn.iam.get_service_account(name).await, "cannot get ServiceAccount")
    }
}

#[async_trait]
impl ExternalClient<ServiceAccount> for ServiceAccountExternal {
    async fn observe(&self, mr: &mut ServiceAccount) -> Result<ExternalObservation, ControllerError> {
        let name = self.name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_service_account(p, &observed));
        mr.set_at_provider(generate_service_account_observation(&observed));
        mr.set_conditions([Condition::available()]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_service_account_up_to_date(mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut ServiceAccount) -> Result<ExternalCreation, ControllerError> {
        let account_id = external_name(mr)?;
        let mut account = gcp::ServiceAccount::default();
        generate_service_account(mr.for_provider(), &mut account);
        self.conn
            .iam
            .create_service_account(&self.conn.project, &account_id, &account)
            .await
            .map_err(ControllerError::gcp("cannot create ServiceAccount"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut ServiceAccount) -> Result<ExternalUpdate, ControllerError> {
        let name = self.name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalUpdate::default());
        };
        let (account, mask) = generate_service_account_update(mr.for_provider(), &observed)?;
        if mask.is_empty() {
            return Ok(ExternalUpdate::default());
        }
        self.conn
            .iam
            .patch_service_account(&name, &account, &mask)
            .await
            .map_err(ControllerError::gcp("cannot update ServiceAccount"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut ServiceAccount) -> Result<Deletion, ControllerError> {
        let name = self.name(mr)?;
        deleted(
            self.conn.iam.delete_service_account(&name).await,
            "cannot delete ServiceAccount",
        )?;
        Ok(Deletion::Complete)
    }
}
