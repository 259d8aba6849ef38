//! Registry of every managed resource kind
//!
//! `KINDS` is the static table consumed by crdgen and by controller
//! bootstrap. `AnyManaged` is the closed set of managed kinds as a value, for
//! code that handles "some managed resource" without knowing which.

use crate::compute::{Address, Firewall, GlobalAddress, Network, Subnetwork};
use crate::database::CloudSQLInstance;
use crate::iam::ServiceAccount;
use crate::kms::{CryptoKey, CryptoKeyPolicy, KeyRing};
use crate::provider_config::ProviderConfig;
use crate::pubsub::{Subscription, Topic};
use crate::secretsmanager::{Secret, SecretVersion};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::{ApiResource, DynamicObject};
use kube::{CustomResourceExt, Resource, ResourceExt};
use thiserror::Error;

/// A registered managed resource kind
#[derive(Debug, Clone, Copy)]
pub struct Kind {
    /// Group, version, kind and plural of the resource
    pub api_resource: fn() -> ApiResource,
    /// CRD constructor
    pub crd: fn() -> CustomResourceDefinition,
}

fn api_resource<K: Resource<DynamicType = ()>>() -> ApiResource {
    ApiResource::erase::<K>(&())
}

macro_rules! kind {
    ($ty:ty) => {
        Kind {
            api_resource: api_resource::<$ty>,
            crd: <$ty as CustomResourceExt>::crd,
        }
    };
}

impl Kind {
    /// Kind name
    pub fn kind(&self) -> String {
        (self.api_resource)().kind
    }

    /// `group/version`
    pub fn api_version(&self) -> String {
        (self.api_resource)().api_version
    }
}

/// Every managed resource kind
pub static KINDS: &[Kind] = &[
    kind!(Network),
    kind!(Subnetwork),
    kind!(Firewall),
    kind!(Address),
    kind!(GlobalAddress),
    kind!(CloudSQLInstance),
    kind!(KeyRing),
    kind!(CryptoKey),
    kind!(CryptoKeyPolicy),
    kind!(ServiceAccount),
    kind!(Topic),
    kind!(Subscription),
    kind!(Secret),
    kind!(SecretVersion),
];

/// Every CRD of the provider, ProviderConfig first
pub fn all_crds() -> Vec<CustomResourceDefinition> {
    std::iter::once(ProviderConfig::crd())
        .chain(KINDS.iter().map(|k| (k.crd)()))
        .collect()
}

/// Errors converting arbitrary objects into managed resources
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Object kind is not a registered managed kind
    #[error("unknown managed resource kind: {0}")]
    UnknownKind(String),

    /// Object could not be decoded as its kind
    #[error("cannot decode {kind}: {source}")]
    Decode {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Any managed resource
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant, reason = "values are short-lived and rarely moved")]
pub enum AnyManaged {
    Network(Network),
    Subnetwork(Subnetwork),
    Firewall(Firewall),
    Address(Address),
    GlobalAddress(GlobalAddress),
    CloudSQLInstance(CloudSQLInstance),
    KeyRing(KeyRing),
    CryptoKey(CryptoKey),
    CryptoKeyPolicy(CryptoKeyPolicy),
    ServiceAccount(ServiceAccount),
    Topic(Topic),
    Subscription(Subscription),
    Secret(Secret),
    SecretVersion(SecretVersion),
}

macro_rules! any_managed {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for AnyManaged {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*

        impl AnyManaged {
            /// Kind name of the wrapped resource
            pub fn kind(&self) -> String {
                match self {
                    $(Self::$variant(_) => <$variant as Resource>::kind(&()).into_owned(),)*
                }
            }

            /// Object name of the wrapped resource
            pub fn name(&self) -> String {
                match self {
                    $(Self::$variant(r) => r.name_any(),)*
                }
            }

            /// Decode a dynamic object into its managed kind
            pub fn from_dynamic(object: DynamicObject) -> Result<Self, RegistryError> {
                let kind = object.types.as_ref().map(|t| t.kind.clone()).unwrap_or_default();
                let value = serde_json::to_value(&object)
                    .map_err(|source| RegistryError::Decode { kind: kind.clone(), source })?;
                match kind.as_str() {
                    $(
                        k if k == <$variant as Resource>::kind(&()) => serde_json::from_value::<$variant>(value)
                            .map(Self::$variant)
                            .map_err(|source| RegistryError::Decode { kind, source }),
                    )*
                    _ => Err(RegistryError::UnknownKind(kind)),
                }
            }
        }
    };
}

any_managed!(
    Network,
    Subnetwork,
    Firewall,
    Address,
    GlobalAddress,
    CloudSQLInstance,
    KeyRing,
    CryptoKey,
    CryptoKeyPolicy,
    ServiceAccount,
    Topic,
    Subscription,
    Secret,
    SecretVersion,
);
