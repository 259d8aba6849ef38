//! CryptoKey translation
//!
//! `nextRotationTime` moves forward after every rotation, so it is only
//! compared and patched when the user sets it.

use crate::clients::{differing_fields, late_init_map, late_init_nested, late_init_string};
use crate::error::ControllerError;
use crds::{CryptoKeyObservation, CryptoKeyParameters, CryptoKeyVersion, CryptoKeyVersionTemplate};
use gcp_client::common::wire::equivalent;
use gcp_client::models::kms as gcp;

/// Full resource name of a crypto key in `key_ring`
pub fn crypto_key_name(key_ring: &str, crypto_key_id: &str) -> String {
    format!("{key_ring}/cryptoKeys/{crypto_key_id}")
}

/// Write `params` into `key`
pub fn generate_crypto_key(params: &CryptoKeyParameters, key: &mut gcp::CryptoKey) {
    key.purpose.clone_from(&params.purpose);
    key.rotation_period = params.rotation_period.clone().unwrap_or_default();
    if let Some(next) = &params.next_rotation_time {
        key.next_rotation_time.clone_from(next);
    }
    if let Some(template) = &params.version_template {
        key.version_template = Some(gcp::CryptoKeyVersionTemplate {
            protection_level: template.protection_level.clone().unwrap_or_default(),
            algorithm: template.algorithm.clone(),
        });
    }
    key.labels = params.labels.clone().unwrap_or_default();
}

pub fn generate_crypto_key_observation(key: &gcp::CryptoKey) -> CryptoKeyObservation {
    CryptoKeyObservation {
        name: key.name.clone(),
        primary: key.primary.as_ref().map(|v| CryptoKeyVersion {
            name: v.name.clone(),
            state: v.state.clone(),
            protection_level: v.protection_level.clone(),
            algorithm: v.algorithm.clone(),
            create_time: v.create_time.clone(),
        }),
        create_time: key.create_time.clone(),
        next_rotation_time: key.next_rotation_time.clone(),
    }
}

/// Fill unset parameters from `key`
pub fn late_initialize_crypto_key(params: &mut CryptoKeyParameters, key: &gcp::CryptoKey) {
    late_init_string(&mut params.rotation_period, &key.rotation_period);
    late_init_nested(
        &mut params.version_template,
        key.version_template.as_ref(),
        |t: &mut CryptoKeyVersionTemplate, o| {
            late_init_string(&mut t.protection_level, &o.protection_level);
            if t.algorithm.is_empty() {
                t.algorithm.clone_from(&o.algorithm);
            }
        },
    );
    late_init_map(&mut params.labels, &key.labels);
}

pub fn is_crypto_key_up_to_date(params: &CryptoKeyParameters, observed: &gcp::CryptoKey) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_crypto_key(params, &mut desired);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("CryptoKey"))
}

/// Patch body and `updateMask` for the mutable fields that differ
///
/// `purpose` is fixed at creation; a change to it alone fails with
/// `Immutable`.
pub fn generate_crypto_key_update(
    params: &CryptoKeyParameters,
    observed: &gcp::CryptoKey,
) -> Result<(gcp::CryptoKey, Vec<String>), ControllerError> {
    let mut desired = observed.clone();
    generate_crypto_key(params, &mut desired);
    let mut fields = vec!["rotationPeriod", "versionTemplate", "labels"];
    if params.next_rotation_time.is_some() {
        fields.push("nextRotationTime");
    }
    let mask = differing_fields(&desired, observed, &fields).map_err(ControllerError::up_to_date("CryptoKey"))?;
    if mask.is_empty()
        && !differing_fields(&desired, observed, &["purpose"])
            .map_err(ControllerError::up_to_date("CryptoKey"))?
            .is_empty()
    {
        return Err(ControllerError::Immutable("CryptoKey"));
    }
    Ok((desired, mask))
}
