//! Subnetwork translation
//!
//! Compute reports `region` and `network` as URLs while the parameters carry
//! a bare region name, so both are taken from the observed object when
//! checking for drift. Patches must carry the current fingerprint.

use crate::clients::{late_init_bool, late_init_string, late_init_vec};
use crate::error::ControllerError;
use crds::{SubnetworkObservation, SubnetworkParameters, SubnetworkSecondaryRange};
use gcp_client::common::wire::{equivalent, force_send};
use gcp_client::models::compute as gcp;

/// Write `params` into `subnetwork`
pub fn generate_subnetwork(name: &str, params: &SubnetworkParameters, subnetwork: &mut gcp::Subnetwork) {
    subnetwork.name = name.to_string();
    subnetwork.description = params.description.clone().unwrap_or_default();
    subnetwork.ip_cidr_range.clone_from(&params.ip_cidr_range);
    subnetwork.network = params.network.clone().unwrap_or_default();
    subnetwork.region.clone_from(&params.region);
    subnetwork.enable_flow_logs = params.enable_flow_logs.unwrap_or_default();
    if params.enable_flow_logs == Some(false) {
        force_send(&mut subnetwork.force_send_fields, "enableFlowLogs");
    }
    subnetwork.private_ip_google_access = params.private_ip_google_access.unwrap_or_default();
    if params.private_ip_google_access == Some(false) {
        force_send(&mut subnetwork.force_send_fields, "privateIpGoogleAccess");
    }
    subnetwork.secondary_ip_ranges = params
        .secondary_ip_ranges
        .iter()
        .flatten()
        .map(|r| gcp::SubnetworkSecondaryRange {
            range_name: r.range_name.clone(),
            ip_cidr_range: r.ip_cidr_range.clone(),
        })
        .collect();
}

/// PATCH body for `params` against the current `observed` subnetwork
pub fn generate_subnetwork_update(name: &str, params: &SubnetworkParameters, observed: &gcp::Subnetwork) -> gcp::Subnetwork {
    let mut subnetwork = gcp::Subnetwork::default();
    generate_subnetwork(name, params, &mut subnetwork);
    subnetwork.region.clear();
    subnetwork.network.clear();
    subnetwork.fingerprint.clone_from(&observed.fingerprint);
    subnetwork
}

/// Observation of `subnetwork`
pub fn generate_subnetwork_observation(subnetwork: &gcp::Subnetwork) -> SubnetworkObservation {
    SubnetworkObservation {
        creation_timestamp: subnetwork.creation_timestamp.clone(),
        fingerprint: subnetwork.fingerprint.clone(),
        gateway_address: subnetwork.gateway_address.clone(),
        id: subnetwork.id,
        self_link: subnetwork.self_link.clone(),
    }
}

/// Fill unset parameters from `subnetwork`
pub fn late_initialize_subnetwork(params: &mut SubnetworkParameters, subnetwork: &gcp::Subnetwork) {
    late_init_string(&mut params.description, &subnetwork.description);
    late_init_string(&mut params.network, &subnetwork.network);
    late_init_bool(&mut params.enable_flow_logs, subnetwork.enable_flow_logs);
    late_init_bool(&mut params.private_ip_google_access, subnetwork.private_ip_google_access);
    let ranges: Vec<SubnetworkSecondaryRange> = subnetwork
        .secondary_ip_ranges
        .iter()
        .map(|r| SubnetworkSecondaryRange {
            range_name: r.range_name.clone(),
            ip_cidr_range: r.ip_cidr_range.clone(),
        })
        .collect();
    late_init_vec(&mut params.secondary_ip_ranges, &ranges);
}

/// Whether `observed` matches `params`
pub fn is_subnetwork_up_to_date(
    name: &str,
    params: &SubnetworkParameters,
    observed: &gcp::Subnetwork,
) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_subnetwork(name, params, &mut desired);
    desired.region.clone_from(&observed.region);
    desired.network.clone_from(&observed.network);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("Subnetwork"))
}
