//! SecretVersion translation
//!
//! A version's payload is immutable; only its state moves. A destroyed
//! version stays destroyed.

use crate::error::ControllerError;
use crds::{SecretVersionObservation, SecretVersionParameters, SecretVersionState};
use gcp_client::models::secretmanager as gcp;

/// Connection detail key holding the payload
pub const PAYLOAD_KEY: &str = "payload";

/// State transition needed to reach the desired state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Enable,
    Disable,
    Destroy,
}

/// `{secret}/versions/{version}`
pub fn secret_version_name(secret: &str, version: &str) -> String {
    format!("{secret}/versions/{version}")
}

pub fn generate_secret_version_observation(version: &gcp::SecretVersion) -> SecretVersionObservation {
    SecretVersionObservation {
        name: version.name.clone(),
        create_time: version.create_time.clone(),
        destroy_time: version.destroy_time.clone(),
        state: version.state.clone(),
    }
}

pub fn late_initialize_secret_version(params: &mut SecretVersionParameters, version: &gcp::SecretVersion) {
    if params.desired_secret_version_state.is_none() {
        params.desired_secret_version_state = SecretVersionState::from_provider(&version.state);
    }
}

/// Transition from the `observed` provider state to `desired`, if any
pub fn state_change(desired: SecretVersionState, observed: &str) -> Result<Option<StateChange>, ControllerError> {
    let observed = SecretVersionState::from_provider(observed);
    match (desired, observed) {
        (d, Some(o)) if d == o => Ok(None),
        (_, Some(SecretVersionState::Destroyed)) => Err(ControllerError::InvalidSpec(format!(
            "a destroyed secret version cannot become {}",
            desired.as_str()
        ))),
        (SecretVersionState::Enabled, _) => Ok(Some(StateChange::Enable)),
        (SecretVersionState::Disabled, _) => Ok(Some(StateChange::Disable)),
        (SecretVersionState::Destroyed, _) => Ok(Some(StateChange::Destroy)),
    }
}

/// Whether the observed state is the desired one
pub fn is_secret_version_up_to_date(params: &SecretVersionParameters, observed: &gcp::SecretVersion) -> bool {
    let desired = params.desired_secret_version_state.unwrap_or_default();
    SecretVersionState::from_provider(&observed.state) == Some(desired)
}
