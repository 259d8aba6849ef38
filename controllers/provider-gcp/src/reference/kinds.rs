//! Reference resolution per managed kind

use super::{
    MultiResolutionRequest, ObjectReader, ReferenceError, ResolutionRequest, ResolveReferences, controller_uid,
    resolve, resolve_multiple,
};
use async_trait::async_trait;
use crds::{
    Address, AnyManaged, CloudSQLInstance, CryptoKey, CryptoKeyPolicy, Firewall, GlobalAddress, KeyRing, Managed,
    Network, Reference, Secret, SecretVersion, Selector, ServiceAccount, Subnetwork, Subscription, Topic,
};

/// `selfLink` of a Network
pub fn network_self_link(network: &Network) -> String {
    network.at_provider().map(|o| o.self_link.clone()).unwrap_or_default()
}

/// `selfLink` of a Subnetwork
pub fn subnetwork_self_link(subnetwork: &Subnetwork) -> String {
    subnetwork.at_provider().map(|o| o.self_link.clone()).unwrap_or_default()
}

/// Full resource name of a KeyRing
pub fn key_ring_name(key_ring: &KeyRing) -> String {
    key_ring.at_provider().map(|o| o.name.clone()).unwrap_or_default()
}

/// Full resource name of a CryptoKey
pub fn crypto_key_name(crypto_key: &CryptoKey) -> String {
    crypto_key.at_provider().map(|o| o.name.clone()).unwrap_or_default()
}

/// IAM member string of a ServiceAccount
pub fn service_account_member(account: &ServiceAccount) -> String {
    account
        .at_provider()
        .map(|o| o.email.as_str())
        .filter(|email| !email.is_empty())
        .map(|email| format!("serviceAccount:{email}"))
        .unwrap_or_default()
}

/// External name of any managed resource
pub fn external_name<T: Managed>(resource: &T) -> String {
    resource.external_name().unwrap_or_default().to_string()
}

/// Resolve one reference triad in place
async fn resolve_field<T: Managed>(
    reader: &dyn ObjectReader,
    value: &mut Option<String>,
    reference: &mut Option<Reference>,
    selector: Option<&Selector>,
    controller_uid: Option<String>,
    extract: fn(&T) -> String,
    field_path: &str,
) -> Result<(), ReferenceError> {
    let response = resolve(
        reader,
        ResolutionRequest {
            current_value: value.clone(),
            reference: reference.clone(),
            selector: selector.cloned(),
            controller_uid,
            extract,
            field_path,
        },
    )
    .await?;
    *value = response.resolved_value;
    if let Some(resolved) = response.resolved_reference {
        *reference = Some(resolved);
    }
    Ok(())
}

impl ResolveReferences for Network {}
impl ResolveReferences for KeyRing {}
impl ResolveReferences for ServiceAccount {}
impl ResolveReferences for Topic {}
impl ResolveReferences for Secret {}

#[async_trait]
impl ResolveReferences for Subnetwork {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let mut cr = self.clone();
        let p = &mut cr.spec.for_provider;
        resolve_field(
            reader,
            &mut p.network,
            &mut p.network_ref,
            p.network_selector.as_ref(),
            controller_uid(self),
            network_self_link,
            "spec.forProvider.network",
        )
        .await?;
        Ok(cr)
    }
}

#[async_trait]
impl ResolveReferences for Firewall {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let mut cr = self.clone();
        let p = &mut cr.spec.for_provider;
        resolve_field(
            reader,
            &mut p.network,
            &mut p.network_ref,
            p.network_selector.as_ref(),
            controller_uid(self),
            network_self_link,
            "spec.forProvider.network",
        )
        .await?;
        Ok(cr)
    }
}

#[async_trait]
impl ResolveReferences for Address {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let mut cr = self.clone();
        let p = &mut cr.spec.for_provider;
        resolve_field(
            reader,
            &mut p.network,
            &mut p.network_ref,
            p.network_selector.as_ref(),
            controller_uid(self),
            network_self_link,
            "spec.forProvider.network",
        )
        .await?;
        resolve_field(
            reader,
            &mut p.subnetwork,
            &mut p.subnetwork_ref,
            p.subnetwork_selector.as_ref(),
            controller_uid(self),
            subnetwork_self_link,
            "spec.forProvider.subnetwork",
        )
        .await?;
        Ok(cr)
    }
}

#[async_trait]
impl ResolveReferences for GlobalAddress {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let Some(reference) = self.spec.for_provider.network_ref.clone() else {
            let mut cr = self.clone();
            let p = &mut cr.spec.for_provider;
            resolve_field(
                reader,
                &mut p.network,
                &mut p.network_ref,
                p.network_selector.as_ref(),
                controller_uid(self),
                network_self_link,
                "spec.forProvider.network",
            )
            .await?;
            return Ok(cr);
        };

        let referencer = NetworkUriReferencerForGlobalAddress::new(reference);
        let link = referencer.build(reader).await?;
        let mut resolved = AnyManaged::GlobalAddress(self.clone());
        referencer.assign(&mut resolved, &link)?;
        match resolved {
            AnyManaged::GlobalAddress(cr) => Ok(cr),
            _ => Err(ReferenceError::WrongKind {
                expected: "GlobalAddress",
            }),
        }
    }
}

#[async_trait]
impl ResolveReferences for CloudSQLInstance {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let mut cr = self.clone();
        if let Some(ip) = cr.spec.for_provider.settings.ip_configuration.as_mut() {
            resolve_field(
                reader,
                &mut ip.private_network,
                &mut ip.private_network_ref,
                ip.private_network_selector.as_ref(),
                controller_uid(self),
                network_self_link,
                "spec.forProvider.settings.ipConfiguration.privateNetwork",
            )
            .await?;
        }
        Ok(cr)
    }
}

#[async_trait]
impl ResolveReferences for CryptoKey {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let mut cr = self.clone();
        let p = &mut cr.spec.for_provider;
        resolve_field(
            reader,
            &mut p.key_ring,
            &mut p.key_ring_ref,
            p.key_ring_selector.as_ref(),
            controller_uid(self),
            key_ring_name,
            "spec.forProvider.keyRing",
        )
        .await?;
        Ok(cr)
    }
}

#[async_trait]
impl ResolveReferences for CryptoKeyPolicy {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let mut cr = self.clone();
        let p = &mut cr.spec.for_provider;
        resolve_field(
            reader,
            &mut p.crypto_key,
            &mut p.crypto_key_ref,
            p.crypto_key_selector.as_ref(),
            controller_uid(self),
            crypto_key_name,
            "spec.forProvider.cryptoKey",
        )
        .await?;

        for (i, binding) in p.policy.bindings.iter_mut().enumerate() {
            if binding.service_account_member_refs.is_empty() && binding.service_account_member_selector.is_none() {
                continue;
            }
            let field_path = format!("spec.forProvider.policy.bindings[{i}].members");
            let response = resolve_multiple(
                reader,
                MultiResolutionRequest {
                    current_values: binding.members.clone(),
                    references: binding.service_account_member_refs.clone(),
                    selector: binding.service_account_member_selector.clone(),
                    controller_uid: controller_uid(self),
                    extract: service_account_member,
                    field_path: &field_path,
                },
            )
            .await?;
            binding.members = response.resolved_values;
            binding.service_account_member_refs = response.resolved_references;
        }
        Ok(cr)
    }
}

#[async_trait]
impl ResolveReferences for Subscription {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let mut cr = self.clone();
        let p = &mut cr.spec.for_provider;
        resolve_field(
            reader,
            &mut p.topic,
            &mut p.topic_ref,
            p.topic_selector.as_ref(),
            controller_uid(self),
            external_name::<Topic>,
            "spec.forProvider.topic",
        )
        .await?;
        Ok(cr)
    }
}

#[async_trait]
impl ResolveReferences for SecretVersion {
    async fn resolve_references(&self, reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        let mut cr = self.clone();
        let p = &mut cr.spec.for_provider;
        resolve_field(
            reader,
            &mut p.secret,
            &mut p.secret_ref,
            p.secret_selector.as_ref(),
            controller_uid(self),
            external_name::<Secret>,
            "spec.forProvider.secret",
        )
        .await?;
        Ok(cr)
    }
}

/// Resolves `networkRef` of a GlobalAddress held as any managed resource
#[derive(Debug, Clone)]
pub struct NetworkUriReferencerForGlobalAddress {
    /// Network the address belongs to
    pub network_reference: Reference,
}

impl NetworkUriReferencerForGlobalAddress {
    /// Create a referencer for the named Network
    pub fn new(network_reference: Reference) -> Self {
        Self { network_reference }
    }

    /// Self link of the referenced Network
    pub async fn build(&self, reader: &dyn ObjectReader) -> Result<String, ReferenceError> {
        let response = resolve(
            reader,
            ResolutionRequest {
                current_value: None,
                reference: Some(self.network_reference.clone()),
                selector: None,
                controller_uid: None,
                extract: network_self_link,
                field_path: "spec.forProvider.network",
            },
        )
        .await?;
        Ok(response.resolved_value.unwrap_or_default())
    }

    /// Write `value` into the network of `resource`, which must be a GlobalAddress
    pub fn assign(&self, resource: &mut AnyManaged, value: &str) -> Result<(), ReferenceError> {
        let AnyManaged::GlobalAddress(address) = resource else {
            return Err(ReferenceError::WrongKind {
                expected: "GlobalAddress",
            });
        };
        let p = address.for_provider_mut();
        p.network = Some(value.to_string());
        p.network_ref = Some(self.network_reference.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MemoryObjectReader, network, ready};
    use crds::{
        Binding, CryptoKeyPolicyParameters, CryptoKeyPolicySpec, GlobalAddressParameters, GlobalAddressSpec,
        NetworkObservation, NetworkParameters, Policy, ServiceAccountObservation, ServiceAccountParameters,
        ServiceAccountSpec, SubnetworkParameters, SubnetworkSpec,
    };

    fn linked_network(name: &str) -> Network {
        let mut net = ready(network(name, NetworkParameters::default()));
        net.set_at_provider(NetworkObservation {
            self_link: format!("https://www.googleapis.com/compute/v1/projects/p/global/networks/{name}"),
            ..Default::default()
        });
        net
    }

    fn subnetwork_referencing(network: &str) -> Subnetwork {
        Subnetwork::new(
            "sub",
            SubnetworkSpec {
                resource_spec: Default::default(),
                for_provider: SubnetworkParameters {
                    ip_cidr_range: "10.0.0.0/24".to_string(),
                    region: "us-central1".to_string(),
                    network_ref: Some(Reference::new(network)),
                    ..Default::default()
                },
            },
        )
    }

    #[tokio::test]
    async fn test_subnetwork_network_ref_resolves_self_link() {
        let reader = MemoryObjectReader::default().with(&linked_network("vpc"));
        let resolved = subnetwork_referencing("vpc").resolve_references(&reader).await.unwrap();
        assert_eq!(
            resolved.spec.for_provider.network.as_deref(),
            Some("https://www.googleapis.com/compute/v1/projects/p/global/networks/vpc")
        );
    }

    #[tokio::test]
    async fn test_unready_reference_leaves_object_untouched() {
        let mut unready = linked_network("vpc");
        unready.status.as_mut().unwrap().resource_status.conditions.clear();
        let reader = MemoryObjectReader::default().with(&unready);

        let original = subnetwork_referencing("vpc");
        let err = original.resolve_references(&reader).await.unwrap_err();
        assert!(err.to_string().contains("spec.forProvider.network"));
        assert!(original.spec.for_provider.network.is_none());
    }

    #[tokio::test]
    async fn test_policy_member_refs_become_service_account_members() {
        let mut account = ready(ServiceAccount::new(
            "builder",
            ServiceAccountSpec {
                resource_spec: Default::default(),
                for_provider: ServiceAccountParameters::default(),
            },
        ));
        account.set_at_provider(ServiceAccountObservation {
            email: "builder@p.iam.gserviceaccount.com".to_string(),
            ..Default::default()
        });
        let reader = MemoryObjectReader::default().with(&account);

        let policy = CryptoKeyPolicy::new(
            "policy",
            CryptoKeyPolicySpec {
                resource_spec: Default::default(),
                for_provider: CryptoKeyPolicyParameters {
                    crypto_key: Some("projects/p/locations/global/keyRings/r/cryptoKeys/k".to_string()),
                    policy: Policy {
                        bindings: vec![Binding {
                            role: "roles/cloudkms.cryptoKeyEncrypterDecrypter".to_string(),
                            service_account_member_refs: vec![Reference::new("builder")],
                            ..Default::default()
                        }],
                    },
                    ..Default::default()
                },
            },
        );

        let resolved = policy.resolve_references(&reader).await.unwrap();
        assert_eq!(
            resolved.spec.for_provider.policy.bindings[0].members,
            vec!["serviceAccount:builder@p.iam.gserviceaccount.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_global_address_referencer_builds_and_assigns() {
        let reader = MemoryObjectReader::default().with(&linked_network("vpc"));
        let referencer = NetworkUriReferencerForGlobalAddress::new(Reference::new("vpc"));
        let link = referencer.build(&reader).await.unwrap();

        let mut target = AnyManaged::GlobalAddress(GlobalAddress::new(
            "peering-range",
            GlobalAddressSpec {
                resource_spec: Default::default(),
                for_provider: GlobalAddressParameters::default(),
            },
        ));
        referencer.assign(&mut target, &link).unwrap();

        let AnyManaged::GlobalAddress(address) = target else {
            panic!("variant changed");
        };
        assert_eq!(address.spec.for_provider.network.as_deref(), Some(link.as_str()));
        assert_eq!(address.spec.for_provider.network_ref, Some(Reference::new("vpc")));
    }

    #[tokio::test]
    async fn test_global_address_network_ref_resolves() {
        let reader = MemoryObjectReader::default().with(&linked_network("vpc"));
        let address = GlobalAddress::new(
            "peering-range",
            GlobalAddressSpec {
                resource_spec: Default::default(),
                for_provider: GlobalAddressParameters {
                    network: Some("stale".to_string()),
                    network_ref: Some(Reference::new("vpc")),
                    ..Default::default()
                },
            },
        );

        let resolved = address.resolve_references(&reader).await.unwrap();
        assert_eq!(
            resolved.spec.for_provider.network.as_deref(),
            Some("https://www.googleapis.com/compute/v1/projects/p/global/networks/vpc")
        );
        assert_eq!(resolved.spec.for_provider.network_ref, Some(Reference::new("vpc")));
    }

    #[test]
    fn test_global_address_referencer_rejects_other_kinds() {
        let referencer = NetworkUriReferencerForGlobalAddress::new(Reference::new("vpc"));
        let original = AnyManaged::Network(network("vpc", NetworkParameters::default()));
        let mut target = original.clone();

        let err = referencer.assign(&mut target, "https://example/net").unwrap_err();
        assert_eq!(err.to_string(), "managed resource is not a GlobalAddress");
        assert_eq!(target, original);
    }
}
