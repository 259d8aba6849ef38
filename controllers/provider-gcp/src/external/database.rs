//! Cloud SQL external client
//!
//! Handles: CloudSQLInstance
//!
//! The root password is generated at creation and published once; Cloud SQL
//! never returns it. An instance still being created is not patched.

use crate::clients::database::cloudsql::{
    PASSWORD_KEY, USERNAME_KEY, cloudsql_condition, cloudsql_connection_details, default_username,
    generate_cloudsql_observation, generate_database_instance, generate_database_instance_update,
    is_cloudsql_up_to_date, late_initialize_cloudsql,
};
use crate::error::ControllerError;
use crate::external::{deleted, external_name, found};
use crate::managed::{
    ConnectionDetails, Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup,
    late_initialize,
};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{CloudSQLInstance, Managed, STATE_PENDING_CREATE};
use gcp_client::models::sqladmin as gcp;
use tracing::debug;
use uuid::Uuid;

struct CloudSqlExternal {
    conn: Connection,
}

impl Setup for CloudSQLInstance {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(CloudSqlExternal { conn })
    }
}

#[async_trait]
impl ExternalClient<CloudSQLInstance> for CloudSqlExternal {
    async fn observe(&self, mr: &mut CloudSQLInstance) -> Result<ExternalObservation, ControllerError> {
        let name = external_name(mr)?;
        let Some(observed) = found(
            self.conn.sqladmin.get_instance(&self.conn.project, &name).await,
            "cannot get CloudSQLInstance",
        )?
        else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_cloudsql(p, &observed));
        mr.set_at_provider(generate_cloudsql_observation(&observed));
        mr.set_conditions([cloudsql_condition(&observed.state)]);

        let up_to_date = observed.state == STATE_PENDING_CREATE
            || is_cloudsql_up_to_date(&name, mr.for_provider(), &observed)?;
        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
            resource_late_initialized: late_initialized,
            connection_details: cloudsql_connection_details(&observed),
        })
    }

    async fn create(&self, mr: &mut CloudSQLInstance) -> Result<ExternalCreation, ControllerError> {
        let name = external_name(mr)?;
        let mut instance = gcp::DatabaseInstance::default();
        generate_database_instance(&name, mr.for_provider(), &mut instance);
        let password = Uuid::new_v4().simple().to_string();
        instance.root_password.clone_from(&password);

        self.conn
            .sqladmin
            .insert_instance(&self.conn.project, &instance)
            .await
            .map_err(ControllerError::gcp("cannot create CloudSQLInstance"))?;

        let mut details = ConnectionDetails::new();
        details.insert(PASSWORD_KEY.to_string(), password.into_bytes());
        details.insert(
            USERNAME_KEY.to_string(),
            default_username(&instance.database_version).as_bytes().to_vec(),
        );
        Ok(ExternalCreation {
            connection_details: details,
        })
    }

    async fn update(&self, mr: &mut CloudSQLInstance) -> Result<ExternalUpdate, ControllerError> {
        let name = external_name(mr)?;
        let settings_version = mr.at_provider().map_or(0, |o| o.settings_version);
        let instance = generate_database_instance_update(&name, mr.for_provider(), settings_version);
        debug!("Patching CloudSQLInstance {} at settings version {}", name, settings_version);
        self.conn
            .sqladmin
            .patch_instance(&self.conn.project, &name, &instance)
            .await
            .map_err(ControllerError::gcp("cannot update CloudSQLInstance"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut CloudSQLInstance) -> Result<Deletion, ControllerError> {
        let name = external_name(mr)?;
        deleted(
            self.conn.sqladmin.delete_instance(&self.conn.project, &name).await,
            "cannot delete CloudSQLInstance",
        )?;
        Ok(Deletion::Pending)
    }
}
