//! Address translation
//!
//! Addresses cannot be changed after reservation. The region is a path
//! parameter and never part of the body.

use crate::clients::{late_init_i64, late_init_string};
use crate::error::ControllerError;
use crds::{
    ADDRESS_STATUS_IN_USE, ADDRESS_STATUS_RESERVED, ADDRESS_STATUS_RESERVING, AddressObservation, AddressParameters,
    AddressType, Condition, NetworkTier,
};
use gcp_client::common::wire::equivalent;
use gcp_client::models::compute as gcp;

/// Write `params` into `address`
pub fn generate_address(name: &str, params: &AddressParameters, address: &mut gcp::Address) {
    address.name = name.to_string();
    address.address = params.address.clone().unwrap_or_default();
    address.address_type = params.address_type.map(|t| t.as_str().to_string()).unwrap_or_default();
    address.description = params.description.clone().unwrap_or_default();
    address.network = params.network.clone().unwrap_or_default();
    address.network_tier = params.network_tier.map(|t| t.as_str().to_string()).unwrap_or_default();
    address.prefix_length = params.prefix_length.unwrap_or_default();
    address.purpose = params.purpose.clone().unwrap_or_default();
    address.subnetwork = params.subnetwork.clone().unwrap_or_default();
}

/// Observation of `address`
pub fn generate_address_observation(address: &gcp::Address) -> AddressObservation {
    AddressObservation {
        creation_timestamp: address.creation_timestamp.clone(),
        id: address.id,
        self_link: address.self_link.clone(),
        status: address.status.clone(),
        users: address.users.clone(),
    }
}

/// Fill unset parameters from `address`
pub fn late_initialize_address(params: &mut AddressParameters, address: &gcp::Address) {
    late_init_string(&mut params.address, &address.address);
    if params.address_type.is_none() {
        params.address_type = AddressType::from_provider(&address.address_type);
    }
    late_init_string(&mut params.description, &address.description);
    late_init_string(&mut params.network, &address.network);
    if params.network_tier.is_none() {
        params.network_tier = NetworkTier::from_provider(&address.network_tier);
    }
    late_init_i64(&mut params.prefix_length, address.prefix_length);
    late_init_string(&mut params.purpose, &address.purpose);
    late_init_string(&mut params.subnetwork, &address.subnetwork);
}

/// Whether `observed` matches `params`
pub fn is_address_up_to_date(name: &str, params: &AddressParameters, observed: &gcp::Address) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_address(name, params, &mut desired);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("Address"))
}

/// Ready condition for an address status, regional or global
pub fn address_condition(status: &str) -> Condition {
    match status {
        ADDRESS_STATUS_RESERVED | ADDRESS_STATUS_IN_USE => Condition::available(),
        ADDRESS_STATUS_RESERVING => Condition::creating(),
        _ => Condition::unavailable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcp_client::common::wire::to_wire;

    #[test]
    fn test_address_type_is_late_initialized_and_sent() {
        let mut params = AddressParameters {
            region: "us-east1".to_string(),
            ..Default::default()
        };
        let observed = gcp::Address {
            name: "ip".to_string(),
            address: "35.1.2.3".to_string(),
            address_type: "EXTERNAL".to_string(),
            network_tier: "PREMIUM".to_string(),
            region: "https://www.googleapis.com/compute/v1/projects/p/regions/us-east1".to_string(),
            status: ADDRESS_STATUS_RESERVED.to_string(),
            ..Default::default()
        };

        late_initialize_address(&mut params, &observed);
        assert_eq!(params.address_type, Some(AddressType::External));
        assert_eq!(params.network_tier, Some(NetworkTier::Premium));
        assert_eq!(params.address.as_deref(), Some("35.1.2.3"));
        assert!(is_address_up_to_date("ip", &params, &observed).unwrap());

        let mut body = gcp::Address::default();
        generate_address("ip", &params, &mut body);
        let wire = to_wire(&body).unwrap();
        assert_eq!(wire["addressType"], "EXTERNAL");
        assert!(wire.get("region").is_none());
    }

    #[test]
    fn test_changed_tier_is_drift() {
        let observed = gcp::Address {
            name: "ip".to_string(),
            network_tier: "PREMIUM".to_string(),
            ..Default::default()
        };
        let params = AddressParameters {
            network_tier: Some(NetworkTier::Standard),
            ..Default::default()
        };
        assert!(!is_address_up_to_date("ip", &params, &observed).unwrap());
    }

    #[test]
    fn test_address_condition() {
        assert_eq!(address_condition("RESERVED").reason, Condition::available().reason);
        assert_eq!(address_condition("IN_USE").reason, Condition::available().reason);
        assert_eq!(address_condition("RESERVING").reason, Condition::creating().reason);
        assert_eq!(address_condition("").reason, Condition::unavailable().reason);
    }
}
