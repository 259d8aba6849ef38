//! Network translation

use crate::clients::{late_init_bool, late_init_string};
use crate::error::ControllerError;
use crds::{NetworkObservation, NetworkParameters, NetworkPeering, NetworkRoutingConfig, RoutingMode};
use gcp_client::common::wire::{equivalent, force_send};
use gcp_client::models::compute as gcp;

/// Write `params` into `network`
pub fn generate_network(name: &str, params: &NetworkParameters, network: &mut gcp::Network) {
    network.name = name.to_string();
    network.description = params.description.clone().unwrap_or_default();
    network.auto_create_subnetworks = params.auto_create_subnetworks.unwrap_or_default();
    if params.auto_create_subnetworks == Some(false) {
        force_send(&mut network.force_send_fields, "autoCreateSubnetworks");
    }
    if let Some(rc) = &params.routing_config {
        network.routing_config = Some(gcp::NetworkRoutingConfig {
            routing_mode: rc.routing_mode.as_str().to_string(),
        });
    }
}

/// Observation of `network`
pub fn generate_network_observation(network: &gcp::Network) -> NetworkObservation {
    NetworkObservation {
        creation_timestamp: network.creation_timestamp.clone(),
        gateway_ipv4: network.gateway_ipv4.clone(),
        id: network.id,
        peerings: network
            .peerings
            .iter()
            .map(|p| NetworkPeering {
                name: p.name.clone(),
                network: p.network.clone(),
                state: p.state.clone(),
                state_details: p.state_details.clone(),
                exchange_subnet_routes: p.exchange_subnet_routes,
            })
            .collect(),
        self_link: network.self_link.clone(),
        subnetworks: network.subnetworks.clone(),
    }
}

/// Fill unset parameters from `network`
pub fn late_initialize_network(params: &mut NetworkParameters, network: &gcp::Network) {
    late_init_string(&mut params.description, &network.description);
    late_init_bool(&mut params.auto_create_subnetworks, network.auto_create_subnetworks);
    if params.routing_config.is_none() {
        params.routing_config = network
            .routing_config
            .as_ref()
            .and_then(|rc| RoutingMode::from_provider(&rc.routing_mode))
            .map(|routing_mode| NetworkRoutingConfig { routing_mode });
    }
}

/// Whether `observed` matches `params`, and whether an auto mode network
/// must first be switched to custom mode
pub fn is_network_up_to_date(
    name: &str,
    params: &NetworkParameters,
    observed: &gcp::Network,
) -> Result<(bool, bool), ControllerError> {
    let switch_to_custom = params.auto_create_subnetworks == Some(false) && observed.auto_create_subnetworks;
    let mut desired = observed.clone();
    generate_network(name, params, &mut desired);
    let up_to_date = equivalent(&desired, observed).map_err(ControllerError::up_to_date("Network"))?;
    Ok((up_to_date, switch_to_custom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcp_client::common::wire::to_wire;
    use serde_json::json;

    fn observed_network() -> gcp::Network {
        gcp::Network {
            name: "vpc".to_string(),
            description: "shared vpc".to_string(),
            auto_create_subnetworks: true,
            routing_config: Some(gcp::NetworkRoutingConfig {
                routing_mode: "REGIONAL".to_string(),
            }),
            id: 42,
            self_link: "https://www.googleapis.com/compute/v1/projects/p/global/networks/vpc".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_forces_custom_mode() {
        let params = NetworkParameters {
            auto_create_subnetworks: Some(false),
            ..Default::default()
        };
        let mut network = gcp::Network::default();
        generate_network("vpc", &params, &mut network);
        assert_eq!(
            to_wire(&network).unwrap(),
            json!({"name": "vpc", "autoCreateSubnetworks": false})
        );
    }

    #[test]
    fn test_observation_round_trip() {
        let params = NetworkParameters {
            description: Some("shared vpc".to_string()),
            auto_create_subnetworks: Some(true),
            routing_config: Some(NetworkRoutingConfig {
                routing_mode: RoutingMode::Global,
            }),
        };
        let mut network = gcp::Network::default();
        generate_network("vpc", &params, &mut network);

        let mut recovered = NetworkParameters::default();
        late_initialize_network(&mut recovered, &network);
        assert_eq!(recovered, params);
    }

    #[test]
    fn test_late_initialize_is_idempotent_and_keeps_user_values() {
        let mut params = NetworkParameters {
            description: Some("mine".to_string()),
            ..Default::default()
        };
        late_initialize_network(&mut params, &observed_network());
        let once = params.clone();
        late_initialize_network(&mut params, &observed_network());

        assert_eq!(params, once);
        assert_eq!(params.description.as_deref(), Some("mine"));
        assert_eq!(params.auto_create_subnetworks, Some(true));
        assert_eq!(
            params.routing_config.map(|rc| rc.routing_mode),
            Some(RoutingMode::Regional)
        );
    }

    #[test]
    fn test_up_to_date_after_late_initialize() {
        let observed = observed_network();
        let mut params = NetworkParameters::default();
        late_initialize_network(&mut params, &observed);
        assert_eq!(is_network_up_to_date("vpc", &params, &observed).unwrap(), (true, false));
    }

    #[test]
    fn test_custom_mode_on_auto_network_signals_switch() {
        let observed = observed_network();
        let params = NetworkParameters {
            description: Some("shared vpc".to_string()),
            auto_create_subnetworks: Some(false),
            routing_config: Some(NetworkRoutingConfig {
                routing_mode: RoutingMode::Regional,
            }),
        };
        assert_eq!(is_network_up_to_date("vpc", &params, &observed).unwrap(), (false, true));
    }

    #[test]
    fn test_changed_routing_mode_is_stale_without_switch() {
        let observed = observed_network();
        let params = NetworkParameters {
            description: Some("shared vpc".to_string()),
            auto_create_subnetworks: Some(true),
            routing_config: Some(NetworkRoutingConfig {
                routing_mode: RoutingMode::Global,
            }),
        };
        assert_eq!(is_network_up_to_date("vpc", &params, &observed).unwrap(), (false, false));
    }
}
