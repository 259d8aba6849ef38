//! GlobalAddress translation

use crate::clients::{late_init_i64, late_init_string};
use crate::error::ControllerError;
use crds::{AddressType, GlobalAddressObservation, GlobalAddressParameters, NetworkTier};
use gcp_client::common::wire::equivalent;
use gcp_client::models::compute as gcp;

/// Write `params` into `address`
pub fn generate_global_address(name: &str, params: &GlobalAddressParameters, address: &mut gcp::Address) {
    address.name = name.to_string();
    address.address = params.address.clone().unwrap_or_default();
    address.address_type = params.address_type.map(|t| t.as_str().to_string()).unwrap_or_default();
    address.description = params.description.clone().unwrap_or_default();
    address.ip_version = params.ip_version.clone().unwrap_or_default();
    address.network = params.network.clone().unwrap_or_default();
    address.network_tier = params.network_tier.map(|t| t.as_str().to_string()).unwrap_or_default();
    address.prefix_length = params.prefix_length.unwrap_or_default();
    address.purpose = params.purpose.clone().unwrap_or_default();
}

pub fn generate_global_address_observation(address: &gcp::Address) -> GlobalAddressObservation {
    GlobalAddressObservation {
        creation_timestamp: address.creation_timestamp.clone(),
        id: address.id,
        self_link: address.self_link.clone(),
        status: address.status.clone(),
        users: address.users.clone(),
    }
}

/// Fill unset parameters from `address`
pub fn late_initialize_global_address(params: &mut GlobalAddressParameters, address: &gcp::Address) {
    late_init_string(&mut params.address, &address.address);
    if params.address_type.is_none() {
        params.address_type = AddressType::from_provider(&address.address_type);
    }
    late_init_string(&mut params.description, &address.description);
    late_init_string(&mut params.ip_version, &address.ip_version);
    late_init_string(&mut params.network, &address.network);
    if params.network_tier.is_none() {
        params.network_tier = NetworkTier::from_provider(&address.network_tier);
    }
    late_init_i64(&mut params.prefix_length, address.prefix_length);
    late_init_string(&mut params.purpose, &address.purpose);
}

pub fn is_global_address_up_to_date(
    name: &str,
    params: &GlobalAddressParameters,
    observed: &gcp::Address,
) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_global_address(name, params, &mut desired);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("GlobalAddress"))
}
