//! Firewall translation

use crate::clients::{late_init_bool, late_init_i64, late_init_string, late_init_vec};
use crate::error::ControllerError;
use crds::{FirewallDirection, FirewallLogConfig, FirewallObservation, FirewallParameters, FirewallRule};
use gcp_client::common::wire::{equivalent, force_send};
use gcp_client::models::compute as gcp;

fn to_gcp_rules(rules: Option<&Vec<FirewallRule>>) -> Vec<gcp::FirewallRule> {
    rules
        .into_iter()
        .flatten()
        .map(|r| gcp::FirewallRule {
            ip_protocol: r.ip_protocol.clone(),
            ports: r.ports.clone().unwrap_or_default(),
        })
        .collect()
}

fn from_gcp_rules(rules: &[gcp::FirewallRule]) -> Vec<FirewallRule> {
    rules
        .iter()
        .map(|r| FirewallRule {
            ip_protocol: r.ip_protocol.clone(),
            ports: (!r.ports.is_empty()).then(|| r.ports.clone()),
        })
        .collect()
}

/// Write `params` into `firewall`
pub fn generate_firewall(name: &str, params: &FirewallParameters, firewall: &mut gcp::Firewall) {
    firewall.name = name.to_string();
    firewall.description = params.description.clone().unwrap_or_default();
    firewall.network = params.network.clone().unwrap_or_default();
    firewall.priority = params.priority.unwrap_or_default();
    if params.priority == Some(0) {
        force_send(&mut firewall.force_send_fields, "priority");
    }
    firewall.source_ranges = params.source_ranges.clone().unwrap_or_default();
    firewall.destination_ranges = params.destination_ranges.clone().unwrap_or_default();
    firewall.source_tags = params.source_tags.clone().unwrap_or_default();
    firewall.target_tags = params.target_tags.clone().unwrap_or_default();
    firewall.source_service_accounts = params.source_service_accounts.clone().unwrap_or_default();
    firewall.target_service_accounts = params.target_service_accounts.clone().unwrap_or_default();
    firewall.allowed = to_gcp_rules(params.allowed.as_ref());
    firewall.denied = to_gcp_rules(params.denied.as_ref());
    firewall.direction = params.direction.map(|d| d.as_str().to_string()).unwrap_or_default();
    if let Some(log_config) = &params.log_config {
        let mut config = gcp::FirewallLogConfig {
            enable: log_config.enable,
            force_send_fields: Vec::new(),
        };
        if !log_config.enable {
            force_send(&mut config.force_send_fields, "enable");
        }
        firewall.log_config = Some(config);
    }
    firewall.disabled = params.disabled.unwrap_or_default();
    if params.disabled == Some(false) {
        force_send(&mut firewall.force_send_fields, "disabled");
    }
}

/// Observation of `firewall`
pub fn generate_firewall_observation(firewall: &gcp::Firewall) -> FirewallObservation {
    FirewallObservation {
        creation_timestamp: firewall.creation_timestamp.clone(),
        id: firewall.id,
        self_link: firewall.self_link.clone(),
    }
}

/// Fill unset parameters from `firewall`
pub fn late_initialize_firewall(params: &mut FirewallParameters, firewall: &gcp::Firewall) {
    late_init_string(&mut params.description, &firewall.description);
    late_init_string(&mut params.network, &firewall.network);
    late_init_i64(&mut params.priority, firewall.priority);
    late_init_vec(&mut params.source_ranges, &firewall.source_ranges);
    late_init_vec(&mut params.destination_ranges, &firewall.destination_ranges);
    late_init_vec(&mut params.source_tags, &firewall.source_tags);
    late_init_vec(&mut params.target_tags, &firewall.target_tags);
    late_init_vec(&mut params.source_service_accounts, &firewall.source_service_accounts);
    late_init_vec(&mut params.target_service_accounts, &firewall.target_service_accounts);
    late_init_vec(&mut params.allowed, &from_gcp_rules(&firewall.allowed));
    late_init_vec(&mut params.denied, &from_gcp_rules(&firewall.denied));
    if params.direction.is_none() {
        params.direction = FirewallDirection::from_provider(&firewall.direction);
    }
    if params.log_config.is_none() {
        params.log_config = firewall
            .log_config
            .as_ref()
            .map(|c| FirewallLogConfig { enable: c.enable });
    }
    late_init_bool(&mut params.disabled, firewall.disabled);
}

/// Whether `observed` matches `params`
pub fn is_firewall_up_to_date(name: &str, params: &FirewallParameters, observed: &gcp::Firewall) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_firewall(name, params, &mut desired);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("Firewall"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcp_client::common::wire::to_wire;

    #[test]
    fn test_disabled_is_late_initialized_then_up_to_date() {
        let mut params = FirewallParameters {
            network: Some("net-a".to_string()),
            disabled: None,
            ..Default::default()
        };
        let observed = gcp::Firewall {
            name: "fw".to_string(),
            network: "net-a".to_string(),
            disabled: true,
            ..Default::default()
        };

        late_initialize_firewall(&mut params, &observed);
        assert_eq!(params.disabled, Some(true));
        assert!(is_firewall_up_to_date("fw", &params, &observed).unwrap());
    }

    #[test]
    fn test_zero_priority_and_enabled_are_sent() {
        let params = FirewallParameters {
            network: Some("net-a".to_string()),
            priority: Some(0),
            disabled: Some(false),
            log_config: Some(FirewallLogConfig { enable: false }),
            ..Default::default()
        };
        let mut firewall = gcp::Firewall::default();
        generate_firewall("fw", &params, &mut firewall);

        let wire = to_wire(&firewall).unwrap();
        assert_eq!(wire["priority"], 0);
        assert_eq!(wire["disabled"], false);
        assert_eq!(wire["logConfig"]["enable"], false);
        assert!(wire.get("sourceRanges").is_none());
    }

    #[test]
    fn test_rules_round_trip() {
        let params = FirewallParameters {
            network: Some("net-a".to_string()),
            priority: Some(900),
            source_ranges: Some(vec!["10.0.0.0/8".to_string()]),
            allowed: Some(vec![
                FirewallRule {
                    ip_protocol: "tcp".to_string(),
                    ports: Some(vec!["22".to_string(), "443".to_string()]),
                },
                FirewallRule {
                    ip_protocol: "icmp".to_string(),
                    ports: None,
                },
            ]),
            direction: Some(FirewallDirection::Ingress),
            ..Default::default()
        };
        let mut firewall = gcp::Firewall::default();
        generate_firewall("fw", &params, &mut firewall);

        let mut recovered = FirewallParameters::default();
        late_initialize_firewall(&mut recovered, &firewall);
        assert_eq!(recovered, params);
        assert!(is_firewall_up_to_date("fw", &recovered, &firewall).unwrap());
    }

    #[test]
    fn test_changed_ports_are_drift() {
        let observed = gcp::Firewall {
            name: "fw".to_string(),
            allowed: vec![gcp::FirewallRule {
                ip_protocol: "tcp".to_string(),
                ports: vec!["22".to_string()],
            }],
            ..Default::default()
        };
        let params = FirewallParameters {
            allowed: Some(vec![FirewallRule {
                ip_protocol: "tcp".to_string(),
                ports: Some(vec!["2222".to_string()]),
            }]),
            ..Default::default()
        };
        assert!(!is_firewall_up_to_date("fw", &params, &observed).unwrap());
    }

    #[test]
    fn test_observation() {
        let observed = gcp::Firewall {
            id: 3,
            self_link: "link".to_string(),
            ..Default::default()
        };
        let observation = generate_firewall_observation(&observed);
        assert_eq!(observation.id, 3);
        assert_eq!(observation.self_link, "link");
    }
}
