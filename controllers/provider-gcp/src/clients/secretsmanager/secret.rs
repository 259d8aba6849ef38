//! Secret translation
//!
//! Replication is fixed at creation; only labels can be patched. An unset
//! replication means automatic replication.

use crate::clients::{differing_fields, late_init_map};
use crate::error::ControllerError;
use crds::{Replica, SecretObservation, SecretParameters, SecretReplication, UserManagedReplication};
use gcp_client::common::wire::{equivalent, force_send};
use gcp_client::models::secretmanager as gcp;

/// `projects/{project}/secrets/{secret_id}`
pub fn secret_name(project: &str, secret_id: &str) -> String {
    format!("projects/{project}/secrets/{secret_id}")
}

fn generate_replication(replication: Option<&SecretReplication>) -> gcp::Replication {
    let user_managed = replication
        .and_then(|r| r.user_managed.as_ref())
        .filter(|_| replication.and_then(|r| r.automatic) != Some(true));
    match user_managed {
        Some(um) => gcp::Replication {
            user_managed: Some(gcp::UserManagedReplication {
                replicas: um
                    .replicas
                    .iter()
                    .map(|r| gcp::Replica {
                        location: r.location.clone(),
                    })
                    .collect(),
            }),
            ..Default::default()
        },
        None => {
            let mut automatic = gcp::Replication {
                automatic: Some(gcp::AutomaticReplication {}),
                ..Default::default()
            };
            force_send(&mut automatic.force_send_fields, "automatic");
            automatic
        }
    }
}

pub fn generate_secret(params: &SecretParameters, secret: &mut gcp::Secret) {
    secret.replication = Some(generate_replication(params.replication.as_ref()));
    secret.labels = params.labels.clone().unwrap_or_default();
}

pub fn generate_secret_observation(secret: &gcp::Secret) -> SecretObservation {
    SecretObservation {
        create_time: secret.create_time.clone(),
    }
}

pub fn late_initialize_secret(params: &mut SecretParameters, secret: &gcp::Secret) {
    if params.replication.is_none() {
        params.replication = secret.replication.as_ref().map(|r| match &r.user_managed {
            Some(um) => SecretReplication {
                automatic: None,
                user_managed: Some(UserManagedReplication {
                    replicas: um
                        .replicas
                        .iter()
                        .map(|r| Replica {
                            location: r.location.clone(),
                        })
                        .collect(),
                }),
            },
            None => SecretReplication {
                automatic: Some(true),
                user_managed: None,
            },
        });
    }
    late_init_map(&mut params.labels, &secret.labels);
}

/// Whether the labels match; replication cannot change
pub fn is_secret_up_to_date(params: &SecretParameters, observed: &gcp::Secret) -> Result<bool, ControllerError> {
    let mut desired = observed.clone();
    desired.labels = params.labels.clone().unwrap_or_default();
    equivalent(&desired, observed).map_err(ControllerError::up_to_date("Secret"))
}

/// Patch body and `updateMask` for the labels
pub fn generate_secret_update(
    params: &SecretParameters,
    observed: &gcp::Secret,
) -> Result<(gcp::Secret, Vec<String>), ControllerError> {
    let desired = gcp::Secret {
        name: observed.name.clone(),
        labels: params.labels.clone().unwrap_or_default(),
        ..Default::default()
    };
    let mask = differing_fields(&desired, observed, &["labels"]).map_err(ControllerError::up_to_date("Secret"))?;
    Ok((desired, mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcp_client::common::wire::to_wire;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_unset_replication_is_automatic_on_the_wire() {
        let mut secret = gcp::Secret::default();
        generate_secret(&SecretParameters::default(), &mut secret);
        assert_eq!(to_wire(&secret).unwrap(), json!({"replication": {"automatic": {}}}));
    }

    #[test]
    fn test_user_managed_replicas() {
        let params = SecretParameters {
            replication: Some(SecretReplication {
                automatic: None,
                user_managed: Some(UserManagedReplication {
                    replicas: vec![Replica {
                        location: "europe-west4".to_string(),
                    }],
                }),
            }),
            labels: None,
        };
        let mut secret = gcp::Secret::default();
        generate_secret(&params, &mut secret);
        assert_eq!(
            to_wire(&secret).unwrap(),
            json!({"replication": {"userManaged": {"replicas": [{"location": "europe-west4"}]}}})
        );

        let mut recovered = SecretParameters::default();
        late_initialize_secret(&mut recovered, &secret);
        assert_eq!(recovered, params);
    }

    #[test]
    fn test_labels_drive_update() {
        let observed = gcp::Secret {
            name: secret_name("p", "db-password"),
            replication: Some(gcp::Replication {
                automatic: Some(gcp::AutomaticReplication {}),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut params = SecretParameters::default();
        late_initialize_secret(&mut params, &observed);
        assert_eq!(params.replication.as_ref().and_then(|r| r.automatic), Some(true));
        assert!(is_secret_up_to_date(&params, &observed).unwrap());

        params.labels = Some(BTreeMap::from([("owner".to_string(), "db".to_string())]));
        assert!(!is_secret_up_to_date(&params, &observed).unwrap());
        let (secret, mask) = generate_secret_update(&params, &observed).unwrap();
        assert_eq!(mask, vec!["labels".to_string()]);
        assert_eq!(secret.name, "projects/p/secrets/db-password");
    }
}
