//! CryptoKeyPolicy translation
//!
//! IAM returns bindings and members in any order, so policies are compared
//! in a canonical sorted form.

use crds::{CryptoKeyPolicyObservation, CryptoKeyPolicyParameters, Policy};
use gcp_client::models::kms as gcp;

/// Policy version required when any binding carries a condition
pub const CONDITIONAL_POLICY_VERSION: i64 = 3;

/// Provider policy for `policy`, to be written over the policy tagged `etag`
pub fn generate_policy(policy: &Policy, etag: &str) -> gcp::Policy {
    let bindings: Vec<gcp::Binding> = policy
        .bindings
        .iter()
        .map(|b| gcp::Binding {
            role: b.role.clone(),
            members: b.members.clone(),
            condition: b.condition.as_ref().map(|c| gcp::Expr {
                expression: c.expression.clone(),
                title: c.title.clone().unwrap_or_default(),
                description: c.description.clone().unwrap_or_default(),
                location: c.location.clone().unwrap_or_default(),
            }),
        })
        .collect();
    let version = if bindings.iter().any(|b| b.condition.is_some()) {
        CONDITIONAL_POLICY_VERSION
    } else {
        1
    };
    gcp::Policy {
        bindings,
        etag: etag.to_string(),
        version,
    }
}

pub fn generate_policy_observation(policy: &gcp::Policy) -> CryptoKeyPolicyObservation {
    CryptoKeyPolicyObservation {
        etag: policy.etag.clone(),
        version: policy.version,
    }
}

/// Whether a policy has been set on the key
///
/// A key that never had a policy reports version 0; any written policy,
/// even one without bindings, carries a version.
pub fn policy_exists(policy: &gcp::Policy) -> bool {
    policy.version > 0 || !policy.bindings.is_empty()
}

type CanonicalBinding = (String, Vec<String>, Option<(String, String, String, String)>);

fn canonical(policy: &gcp::Policy) -> Vec<CanonicalBinding> {
    let mut bindings: Vec<CanonicalBinding> = policy
        .bindings
        .iter()
        .filter(|b| !b.members.is_empty())
        .map(|b| {
            let mut members = b.members.clone();
            members.sort();
            members.dedup();
            let condition = b.condition.as_ref().map(|c| {
                (
                    c.expression.clone(),
                    c.title.clone(),
                    c.description.clone(),
                    c.location.clone(),
                )
            });
            (b.role.clone(), members, condition)
        })
        .collect();
    bindings.sort();
    bindings
}

/// Whether `observed` grants exactly what `params` declares
pub fn is_policy_up_to_date(params: &CryptoKeyPolicyParameters, observed: &gcp::Policy) -> bool {
    canonical(&generate_policy(&params.policy, "")) == canonical(observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crds::{Binding, Expr};

    fn params() -> CryptoKeyPolicyParameters {
        CryptoKeyPolicyParameters {
            crypto_key: Some("projects/p/locations/global/keyRings/ring/cryptoKeys/key".to_string()),
            policy: Policy {
                bindings: vec![
                    Binding {
                        role: "roles/cloudkms.cryptoKeyEncrypterDecrypter".to_string(),
                        members: vec!["user:a@example.com".to_string(), "group:ops@example.com".to_string()],
                        ..Default::default()
                    },
                    Binding {
                        role: "roles/cloudkms.viewer".to_string(),
                        members: vec!["user:b@example.com".to_string()],
                        ..Default::default()
                    },
                ],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let observed = gcp::Policy {
            bindings: vec![
                gcp::Binding {
                    role: "roles/cloudkms.viewer".to_string(),
                    members: vec!["user:b@example.com".to_string()],
                    condition: None,
                },
                gcp::Binding {
                    role: "roles/cloudkms.cryptoKeyEncrypterDecrypter".to_string(),
                    members: vec!["group:ops@example.com".to_string(), "user:a@example.com".to_string()],
                    condition: None,
                },
            ],
            etag: "BwXyz".to_string(),
            version: 1,
        };
        assert!(policy_exists(&observed));
        assert!(is_policy_up_to_date(&params(), &observed));
    }

    #[test]
    fn test_missing_member_is_drift() {
        let observed = generate_policy(
            &Policy {
                bindings: vec![params().policy.bindings[0].clone()],
            },
            "BwXyz",
        );
        assert!(!is_policy_up_to_date(&params(), &observed));
    }

    #[test]
    fn test_conditions_require_version_three() {
        let mut policy = params().policy;
        policy.bindings[0].condition = Some(Expr {
            expression: "request.time < timestamp(\"2030-01-01T00:00:00Z\")".to_string(),
            title: Some("expires".to_string()),
            ..Default::default()
        });
        let generated = generate_policy(&policy, "BwXyz");
        assert_eq!(generated.version, CONDITIONAL_POLICY_VERSION);
        assert_eq!(generated.etag, "BwXyz");
        assert_eq!(generate_policy(&params().policy, "").version, 1);
    }

    #[test]
    fn test_empty_policy_does_not_exist() {
        assert!(!policy_exists(&gcp::Policy {
            etag: "ACAB".to_string(),
            ..Default::default()
        }));
    }

    #[test]
    fn test_written_policy_without_bindings_exists() {
        assert!(policy_exists(&gcp::Policy {
            etag: "BwXyz".to_string(),
            version: 1,
            ..Default::default()
        }));
    }
}
