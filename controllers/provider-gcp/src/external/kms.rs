//! Cloud KMS external clients
//!
//! Handles: KeyRing, CryptoKey, CryptoKeyPolicy
//!
//! KMS never deletes key rings or keys, so deleting either only releases the
//! managed resource. A policy is removed by writing an empty one.

use crate::clients::kms::cryptokey::{
    crypto_key_name, generate_crypto_key, generate_crypto_key_observation, generate_crypto_key_update,
    is_crypto_key_up_to_date, late_initialize_crypto_key,
};
use crate::clients::kms::cryptokey_policy::{
    generate_policy, generate_policy_observation, is_policy_up_to_date, policy_exists,
};
use crate::clients::kms::keyring::{generate_key_ring_observation, key_ring_name, key_ring_parent};
use crate::error::ControllerError;
use crate::external::{external_name, found, required};
use crate::managed::{Deletion, ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, Setup, late_initialize};
use crate::providerconfig::Connection;
use async_trait::async_trait;
use crds::{Condition, CryptoKey, CryptoKeyPolicy, KeyRing, Managed, Policy};
use gcp_client::models::kms as gcp;
use kube::ResourceExt;
use tracing::info;

struct KeyRingExternal {
    conn: Connection,
}

impl Setup for KeyRing {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(KeyRingExternal { conn })
    }
}

#[async_trait]
impl ExternalClient<KeyRing> for KeyRingExternal {
    async fn observe(&self, mr: &mut KeyRing) -> Result<ExternalObservation, ControllerError> {
        let id = external_name(mr)?;
        let name = key_ring_name(&self.conn.project, &mr.spec.for_provider.location, &id);
        let Some(observed) = found(self.conn.kms.get_key_ring(&name).await, "cannot get KeyRing")? else {
            return Ok(ExternalObservation::absent());
        };

        mr.set_at_provider(generate_key_ring_observation(&observed));
        mr.set_conditions([Condition::available()]);
        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: true,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut KeyRing) -> Result<ExternalCreation, ControllerError> {
        let id = external_name(mr)?;
        let parent = key_ring_parent(&self.conn.project, &mr.spec.for_provider.location);
        self.conn
            .kms
            .create_key_ring(&parent, &id, &gcp::KeyRing::default())
            .await
            .map_err(ControllerError::gcp("cannot create KeyRing"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, _mr: &mut KeyRing) -> Result<ExternalUpdate, ControllerError> {
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut KeyRing) -> Result<Deletion, ControllerError> {
        info!("KeyRing {} cannot be deleted in KMS; releasing it", mr.name_any());
        Ok(Deletion::Complete)
    }
}

struct CryptoKeyExternal {
    conn: Connection,
}

impl Setup for CryptoKey {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(CryptoKeyExternal { conn })
    }
}

impl CryptoKeyExternal {
    fn name(mr: &CryptoKey) -> Result<String, ControllerError> {
        let id = external_name(mr)?;
        let key_ring = required(mr, mr.spec.for_provider.key_ring.as_ref(), "spec.forProvider.keyRing")?;
        Ok(crypto_key_name(key_ring, &id))
    }

    async fn get(&self, name: &str) -> Result<Option<gcp::CryptoKey>, ControllerError> {
        found(self.conn.kms.get_crypto_key(name).await, "cannot get CryptoKey")
    }
}

#[async_trait]
impl ExternalClient<CryptoKey> for CryptoKeyExternal {
    async fn observe(&self, mr: &mut CryptoKey) -> Result<ExternalObservation, ControllerError> {
        let name = Self::name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalObservation::absent());
        };

        let late_initialized = late_initialize(mr.for_provider_mut(), |p| late_initialize_crypto_key(p, &observed));
        mr.set_at_provider(generate_crypto_key_observation(&observed));
        mr.set_conditions([Condition::available()]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_crypto_key_up_to_date(mr.for_provider(), &observed)?,
            resource_late_initialized: late_initialized,
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut CryptoKey) -> Result<ExternalCreation, ControllerError> {
        let id = external_name(mr)?;
        let key_ring = required(mr, mr.spec.for_provider.key_ring.as_ref(), "spec.forProvider.keyRing")?;
        let mut key = gcp::CryptoKey::default();
        generate_crypto_key(mr.for_provider(), &mut key);
        self.conn
            .kms
            .create_crypto_key(key_ring, &id, &key)
            .await
            .map_err(ControllerError::gcp("cannot create CryptoKey"))?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut CryptoKey) -> Result<ExternalUpdate, ControllerError> {
        let name = Self::name(mr)?;
        let Some(observed) = self.get(&name).await? else {
            return Ok(ExternalUpdate::default());
        };
        let (key, mask) = generate_crypto_key_update(mr.for_provider(), &observed)?;
        if mask.is_empty() {
            return Ok(ExternalUpdate::default());
        }
        self.conn
            .kms
            .patch_crypto_key(&name, &key, &mask)
            .await
            .map_err(ControllerError::gcp("cannot update CryptoKey"))?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut CryptoKey) -> Result<Deletion, ControllerError> {
        info!("CryptoKey {} cannot be deleted in KMS; releasing it", mr.name_any());
        Ok(Deletion::Complete)
    }
}

struct CryptoKeyPolicyExternal {
    conn: Connection,
}

impl Setup for CryptoKeyPolicy {
    fn external(conn: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(CryptoKeyPolicyExternal { conn })
    }
}

impl CryptoKeyPolicyExternal {
    /// Write `policy` over the last observed policy
    async fn set(&self, mr: &CryptoKeyPolicy, policy: &Policy, context: &'static str) -> Result<(), ControllerError> {
        let crypto_key = required(mr, mr.spec.for_provider.crypto_key.as_ref(), "spec.forProvider.cryptoKey")?;
        let etag = mr.at_provider().map(|o| o.etag.as_str()).unwrap_or_default();
        self.conn
            .kms
            .set_crypto_key_iam_policy(crypto_key, &generate_policy(policy, etag))
            .await
            .map_err(ControllerError::gcp(context))?;
        Ok(())
    }
}

#[async_trait]
impl ExternalClient<CryptoKeyPolicy> for CryptoKeyPolicyExternal {
    async fn observe(&self, mr: &mut CryptoKeyPolicy) -> Result<ExternalObservation, ControllerError> {
        let crypto_key = required(mr, mr.spec.for_provider.crypto_key.as_ref(), "spec.forProvider.cryptoKey")?;
        let observed = self
            .conn
            .kms
            .get_crypto_key_iam_policy(crypto_key)
            .await
            .map_err(ControllerError::gcp("cannot get CryptoKeyPolicy"))?;

        // The etag is needed to create the policy as well as to update it.
        mr.set_at_provider(generate_policy_observation(&observed));
        if !policy_exists(&observed) {
            return Ok(ExternalObservation::absent());
        }

        mr.set_conditions([Condition::available()]);
        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: is_policy_up_to_date(mr.for_provider(), &observed),
            ..Default::default()
        })
    }

    async fn create(&self, mr: &mut CryptoKeyPolicy) -> Result<ExternalCreation, ControllerError> {
        self.set(mr, &mr.spec.for_provider.policy, "cannot create CryptoKeyPolicy")
            .await?;
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &mut CryptoKeyPolicy) -> Result<ExternalUpdate, ControllerError> {
        self.set(mr, &mr.spec.for_provider.policy, "cannot update CryptoKeyPolicy")
            .await?;
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mr: &mut CryptoKeyPolicy) -> Result<Deletion, ControllerError> {
        self.set(mr, &Policy::default(), "cannot delete CryptoKeyPolicy").await?;
        Ok(Deletion::Complete)
    }
}
