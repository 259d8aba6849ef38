//! ServiceAccount translation

use crate::clients::{differing_fields, late_init_string};
use crate::error::ControllerError;
use crds::{ServiceAccountObservation, ServiceAccountParameters};
use gcp_client::common::wire::equivalent;
use gcp_client::models::iam as gcp;

const MUTABLE_FIELDS: &[&str] = &["displayName", "description"];

/// Full resource name of the account `account_id` in `project`
pub fn service_account_name(project: &str, account_id: &str) -> String {
    format!("projects/{project}/serviceAccounts/{account_id}@{project}.iam.gserviceaccount.com")
}

pub fn generate_service_account(params: &ServiceAccountParameters, account: &mut gcp::ServiceAccount) {
    account.display_name = params.display_name.clone().unwrap_or_default();
    account.description = params.description.clone().unwrap_or_default();
}

pub fn generate_service_account_observation(account: &gcp::ServiceAccount) -> ServiceAccountObservation {
    ServiceAccountObservation {
        name: account.name.clone(),
        project_id: account.project_id.clone(),
        unique_id: account.unique_id.clone(),
        email: account.email.clone(),
        oauth2_client_id: account.oauth2_client_id.clone(),
        disabled: account.disabled,
    }
}

pub fn late_initialize_service_account(params: &mut ServiceAccountParameters, account: &gcp::ServiceAccount) {
    late_init_string(&mut params.display_name, &account.display_name);
    late_init_string(&mut params.description, &account.description);
}

pub fn is_service_account_up_to_date(
    params: &ServiceAccountParameters,
    observed: &gcp::ServiceAccount,
) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    generate_service_account(params, &mut desired);
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("ServiceAccount"))
}

/// Patch body and `updateMask` for the fields that differ
pub fn generate_service_account_update(
    params: &ServiceAccountParameters,
    observed: &gcp::ServiceAccount,
) -> Result<(gcp::ServiceAccount, Vec<String>), ControllerError> {
    let mut desired = observed.clone();
    generate_service_account(params, &mut desired);
    let mask =
        differing_fields(&desired, observed, MUTABLE_FIELDS).map_err(ControllerError::up_to_date("ServiceAccount"))?;
    Ok((desired, mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed() -> gcp::ServiceAccount {
        gcp::ServiceAccount {
            name: service_account_name("p", "builder"),
            project_id: "p".to_string(),
            unique_id: "1234".to_string(),
            email: "builder@p.iam.gserviceaccount.com".to_string(),
            display_name: "Builder".to_string(),
            etag: "MDEwMjE5MjA=".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_name_format() {
        assert_eq!(
            service_account_name("p", "builder"),
            "projects/p/serviceAccounts/builder@p.iam.gserviceaccount.com"
        );
    }

    #[test]
    fn test_late_init_then_up_to_date() {
        let mut params = ServiceAccountParameters::default();
        late_initialize_service_account(&mut params, &observed());
        assert_eq!(params.display_name.as_deref(), Some("Builder"));
        assert!(is_service_account_up_to_date(&params, &observed()).unwrap());
    }

    #[test]
    fn test_update_mask() {
        let params = ServiceAccountParameters {
            display_name: Some("Builder".to_string()),
            description: Some("CI builds".to_string()),
        };
        let (account, mask) = generate_service_account_update(&params, &observed()).unwrap();
        assert_eq!(mask, vec!["description".to_string()]);
        assert_eq!(account.etag, "MDEwMjE5MjA=");
    }

    #[test]
    fn test_observation() {
        let observation = generate_service_account_observation(&observed());
        assert_eq!(observation.email, "builder@p.iam.gserviceaccount.com");
        assert_eq!(observation.unique_id, "1234");
        assert!(!observation.disabled);
    }
}
