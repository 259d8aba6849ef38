//! Cross-resource reference resolution
//!
//! A managed resource can name another managed resource (`fooRef`) or select
//! one by labels (`fooSelector`) instead of spelling out a provider value such
//! as a self link. Resolution fetches the referenced object, checks that it
//! is Ready, extracts the value and writes it into the referencing field.
//!
//! Resolution of one resource is all-or-nothing: `ResolveReferences`
//! works on a copy that is only returned when every field resolved.

mod kinds;

pub use kinds::*;

use async_trait::async_trait;
use crds::{Managed, Reference, Selector};
use kube::api::ListParams;
use kube::core::{ApiResource, DynamicObject};
use kube::{Api, Client, Resource, ResourceExt};
use thiserror::Error;

/// Errors resolving a reference
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Referenced object does not exist
    #[error("cannot resolve {field_path}: referenced {kind} {name} not found")]
    NotFound {
        field_path: String,
        kind: String,
        name: String,
    },

    /// Referenced object exists but is not Ready
    #[error("cannot resolve {field_path}: referenced {kind} {name} is not ready")]
    NotReady {
        field_path: String,
        kind: String,
        name: String,
    },

    /// Referenced object carries no value to extract
    #[error("cannot resolve {field_path}: referenced {kind} {name} has an empty value")]
    EmptyValue {
        field_path: String,
        kind: String,
        name: String,
    },

    /// Selector matched no Ready object
    #[error("cannot resolve {field_path}: no ready {kind} matches the selector")]
    NoMatch { field_path: String, kind: String },

    /// Reading referenced objects failed
    #[error("cannot resolve {field_path}: cannot read {kind}: {source}")]
    Read {
        field_path: String,
        kind: String,
        #[source]
        source: kube::Error,
    },

    /// Referenced object could not be decoded as its kind
    #[error("cannot decode {kind} {name}: {source}")]
    Decode {
        kind: String,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value assigned to the wrong kind of managed resource
    #[error("managed resource is not a {expected}")]
    WrongKind { expected: &'static str },
}

/// Read access to cluster-scoped objects of any kind
#[async_trait]
pub trait ObjectReader: Send + Sync {
    /// Object of kind `resource` named `name`, if it exists
    async fn get(&self, resource: &ApiResource, name: &str) -> Result<Option<DynamicObject>, kube::Error>;

    /// Objects of kind `resource` matching a label selector
    async fn list(&self, resource: &ApiResource, label_selector: &str) -> Result<Vec<DynamicObject>, kube::Error>;
}

/// `ObjectReader` over the Kubernetes API
#[derive(Clone)]
pub struct KubeObjectReader {
    client: Client,
}

impl std::fmt::Debug for KubeObjectReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeObjectReader").finish_non_exhaustive()
    }
}

impl KubeObjectReader {
    /// Create a reader using `client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectReader for KubeObjectReader {
    async fn get(&self, resource: &ApiResource, name: &str) -> Result<Option<DynamicObject>, kube::Error> {
        Api::<DynamicObject>::all_with(self.client.clone(), resource)
            .get_opt(name)
            .await
    }

    async fn list(&self, resource: &ApiResource, label_selector: &str) -> Result<Vec<DynamicObject>, kube::Error> {
        let params = ListParams::default().labels(label_selector);
        Ok(Api::<DynamicObject>::all_with(self.client.clone(), resource)
            .list(&params)
            .await?
            .items)
    }
}

/// A single-valued reference to resolve
#[derive(Debug)]
pub struct ResolutionRequest<'a, T> {
    /// Value currently in the referencing field
    pub current_value: Option<String>,
    /// Reference by name
    pub reference: Option<Reference>,
    /// Reference by labels
    pub selector: Option<Selector>,
    /// UID of the referencing object's controller, for `matchControllerRef`
    pub controller_uid: Option<String>,
    /// Value of a referenced object
    pub extract: fn(&T) -> String,
    /// Path of the referencing field, for errors
    pub field_path: &'a str,
}

/// Outcome of a single-valued resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolutionResponse {
    pub resolved_value: Option<String>,
    pub resolved_reference: Option<Reference>,
}

/// A multi-valued reference to resolve
#[derive(Debug)]
pub struct MultiResolutionRequest<'a, T> {
    pub current_values: Vec<String>,
    pub references: Vec<Reference>,
    pub selector: Option<Selector>,
    pub controller_uid: Option<String>,
    pub extract: fn(&T) -> String,
    pub field_path: &'a str,
}

/// Outcome of a multi-valued resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiResolutionResponse {
    pub resolved_values: Vec<String>,
    pub resolved_references: Vec<Reference>,
}

/// UID of the controller owning `object`, if any
pub fn controller_uid<K: Resource>(object: &K) -> Option<String> {
    object
        .meta()
        .owner_references
        .iter()
        .flatten()
        .find(|o| o.controller == Some(true))
        .map(|o| o.uid.clone())
}

fn kind_of<T: Managed>() -> String {
    T::kind(&()).into_owned()
}

fn decode<T: Managed>(object: DynamicObject) -> Result<T, ReferenceError> {
    let name = object.name_any();
    serde_json::to_value(object)
        .and_then(serde_json::from_value)
        .map_err(|source| ReferenceError::Decode {
            kind: kind_of::<T>(),
            name,
            source,
        })
}

async fn fetch_ready<T: Managed>(
    reader: &dyn ObjectReader,
    name: &str,
    extract: fn(&T) -> String,
    field_path: &str,
) -> Result<String, ReferenceError> {
    let kind = kind_of::<T>();
    let resource = ApiResource::erase::<T>(&());
    let object = reader
        .get(&resource, name)
        .await
        .map_err(|source| ReferenceError::Read {
            field_path: field_path.to_string(),
            kind: kind.clone(),
            source,
        })?
        .ok_or_else(|| ReferenceError::NotFound {
            field_path: field_path.to_string(),
            kind: kind.clone(),
            name: name.to_string(),
        })?;
    let referenced: T = decode(object)?;
    if !referenced.is_ready() {
        return Err(ReferenceError::NotReady {
            field_path: field_path.to_string(),
            kind,
            name: name.to_string(),
        });
    }
    let value = extract(&referenced);
    if value.is_empty() {
        return Err(ReferenceError::EmptyValue {
            field_path: field_path.to_string(),
            kind,
            name: name.to_string(),
        });
    }
    Ok(value)
}

/// Ready objects selected by `selector`, in list order
async fn select_ready<T: Managed>(
    reader: &dyn ObjectReader,
    selector: &Selector,
    controller_uid: Option<&str>,
    field_path: &str,
) -> Result<Vec<T>, ReferenceError> {
    let resource = ApiResource::erase::<T>(&());
    let objects = reader
        .list(&resource, &selector.label_selector())
        .await
        .map_err(|source| ReferenceError::Read {
            field_path: field_path.to_string(),
            kind: kind_of::<T>(),
            source,
        })?;

    let mut selected = Vec::new();
    for object in objects {
        let candidate: T = decode(object)?;
        if selector.match_controller_ref == Some(true) && self::controller_uid(&candidate).as_deref() != controller_uid {
            continue;
        }
        if candidate.is_ready() {
            selected.push(candidate);
        }
    }
    Ok(selected)
}

/// Resolve a single-valued reference
///
/// A reference wins and overwrites the current value. Otherwise a selector
/// overwrites it with the value of its first Ready match, which becomes the
/// reference. With neither, the current value is kept.
pub async fn resolve<T: Managed>(
    reader: &dyn ObjectReader,
    request: ResolutionRequest<'_, T>,
) -> Result<ResolutionResponse, ReferenceError> {
    if let Some(reference) = request.reference {
        let value = fetch_ready(reader, &reference.name, request.extract, request.field_path).await?;
        return Ok(ResolutionResponse {
            resolved_value: Some(value),
            resolved_reference: Some(reference),
        });
    }

    let Some(selector) = request.selector else {
        return Ok(ResolutionResponse {
            resolved_value: request.current_value.filter(|v| !v.is_empty()),
            resolved_reference: None,
        });
    };

    let selected: Vec<T> = select_ready(reader, &selector, request.controller_uid.as_deref(), request.field_path).await?;
    let chosen = selected
        .iter()
        .map(|object| (object.name_any(), (request.extract)(object)))
        .find(|(_, value)| !value.is_empty())
        .ok_or_else(|| ReferenceError::NoMatch {
            field_path: request.field_path.to_string(),
            kind: kind_of::<T>(),
        })?;
    Ok(ResolutionResponse {
        resolved_value: Some(chosen.1),
        resolved_reference: Some(Reference::new(chosen.0)),
    })
}

/// Resolve a multi-valued reference
///
/// References resolve in order and replace the current values. Without
/// references, a selector yields every Ready match in list order.
pub async fn resolve_multiple<T: Managed>(
    reader: &dyn ObjectReader,
    request: MultiResolutionRequest<'_, T>,
) -> Result<MultiResolutionResponse, ReferenceError> {
    if !request.references.is_empty() {
        let mut resolved_values = Vec::with_capacity(request.references.len());
        for reference in &request.references {
            resolved_values.push(fetch_ready(reader, &reference.name, request.extract, request.field_path).await?);
        }
        return Ok(MultiResolutionResponse {
            resolved_values,
            resolved_references: request.references,
        });
    }

    let Some(selector) = request.selector else {
        return Ok(MultiResolutionResponse {
            resolved_values: request.current_values,
            resolved_references: Vec::new(),
        });
    };

    let selected: Vec<T> = select_ready(reader, &selector, request.controller_uid.as_deref(), request.field_path).await?;
    let (resolved_references, resolved_values): (Vec<_>, Vec<_>) = selected
        .iter()
        .map(|object| (Reference::new(object.name_any()), (request.extract)(object)))
        .filter(|(_, value)| !value.is_empty())
        .unzip();
    if resolved_values.is_empty() {
        return Err(ReferenceError::NoMatch {
            field_path: request.field_path.to_string(),
            kind: kind_of::<T>(),
        });
    }
    Ok(MultiResolutionResponse {
        resolved_values,
        resolved_references,
    })
}

/// Resolution of every reference a managed kind declares
#[async_trait]
pub trait ResolveReferences: Managed {
    /// A copy of `self` with every reference resolved
    async fn resolve_references(&self, _reader: &dyn ObjectReader) -> Result<Self, ReferenceError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MemoryObjectReader, network, ready};
    use crds::{Network, NetworkParameters};

    fn self_link(network: &Network) -> String {
        network.at_provider().map(|o| o.self_link.clone()).unwrap_or_default()
    }

    fn linked(name: &str) -> Network {
        let mut net = network(name, NetworkParameters::default());
        net.set_at_provider(crds::NetworkObservation {
            self_link: format!("https://compute/{name}"),
            ..Default::default()
        });
        net
    }

    fn request(reference: Option<&str>, selector: Option<Selector>) -> ResolutionRequest<'static, Network> {
        ResolutionRequest {
            current_value: None,
            reference: reference.map(Reference::new),
            selector,
            controller_uid: None,
            extract: self_link,
            field_path: "spec.forProvider.network",
        }
    }

    fn team_selector() -> Selector {
        Selector {
            match_labels: Some([("team".to_string(), "a".to_string())].into()),
            match_controller_ref: None,
        }
    }

    #[tokio::test]
    async fn test_no_reference_is_noop() {
        let reader = MemoryObjectReader::default();
        let mut req = request(None, None);
        req.current_value = Some("global/networks/x".to_string());
        let resp = resolve(&reader, req).await.unwrap();
        assert_eq!(resp.resolved_value.as_deref(), Some("global/networks/x"));
        assert!(resp.resolved_reference.is_none());
    }

    #[tokio::test]
    async fn test_reference_resolves_ready_object() {
        let reader = MemoryObjectReader::default().with(&ready(linked("vpc")));
        let resp = resolve(&reader, request(Some("vpc"), None)).await.unwrap();
        assert_eq!(resp.resolved_value.as_deref(), Some("https://compute/vpc"));
        assert_eq!(resp.resolved_reference, Some(Reference::new("vpc")));
    }

    #[tokio::test]
    async fn test_reference_to_unready_object_fails_with_field_path() {
        let reader = MemoryObjectReader::default().with(&linked("vpc"));
        let err = resolve(&reader, request(Some("vpc"), None)).await.unwrap_err();
        assert!(matches!(err, ReferenceError::NotReady { .. }));
        assert!(err.to_string().contains("spec.forProvider.network"));
    }

    #[tokio::test]
    async fn test_reference_to_missing_object_fails() {
        let reader = MemoryObjectReader::default();
        let err = resolve(&reader, request(Some("vpc"), None)).await.unwrap_err();
        assert!(matches!(err, ReferenceError::NotFound { name, .. } if name == "vpc"));
    }

    #[tokio::test]
    async fn test_empty_extracted_value_fails() {
        let reader = MemoryObjectReader::default().with(&ready(network("vpc", NetworkParameters::default())));
        let err = resolve(&reader, request(Some("vpc"), None)).await.unwrap_err();
        assert!(matches!(err, ReferenceError::EmptyValue { .. }));
    }

    #[tokio::test]
    async fn test_selector_picks_first_ready_match_and_sets_reference() {
        let mut unready = linked("a-unready");
        unready.labels_mut().insert("team".to_string(), "a".to_string());
        let mut chosen = ready(linked("b-ready"));
        chosen.labels_mut().insert("team".to_string(), "a".to_string());
        let reader = MemoryObjectReader::default().with(&unready).with(&chosen);

        let resp = resolve(&reader, request(None, Some(team_selector()))).await.unwrap();
        assert_eq!(resp.resolved_value.as_deref(), Some("https://compute/b-ready"));
        assert_eq!(resp.resolved_reference, Some(Reference::new("b-ready")));
    }

    #[tokio::test]
    async fn test_selector_overwrites_current_value() {
        let mut vpc = ready(linked("vpc"));
        vpc.labels_mut().insert("team".to_string(), "a".to_string());
        let reader = MemoryObjectReader::default().with(&vpc);

        let mut req = request(None, Some(team_selector()));
        req.current_value = Some("stale-manual".to_string());
        let resp = resolve(&reader, req).await.unwrap();
        assert_eq!(resp.resolved_value.as_deref(), Some("https://compute/vpc"));
        assert_eq!(resp.resolved_reference, Some(Reference::new("vpc")));
    }

    #[tokio::test]
    async fn test_selector_without_match_fails() {
        let reader = MemoryObjectReader::default().with(&ready(linked("vpc")));
        let err = resolve(&reader, request(None, Some(team_selector()))).await.unwrap_err();
        assert!(matches!(err, ReferenceError::NoMatch { .. }));
    }

    #[tokio::test]
    async fn test_resolve_multiple_keeps_reference_order() {
        let reader = MemoryObjectReader::default()
            .with(&ready(linked("one")))
            .with(&ready(linked("two")));
        let resp = resolve_multiple(
            &reader,
            MultiResolutionRequest {
                current_values: vec!["stale".to_string()],
                references: vec![Reference::new("two"), Reference::new("one")],
                selector: None,
                controller_uid: None,
                extract: self_link,
                field_path: "spec.forProvider.networks",
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.resolved_values, vec!["https://compute/two", "https://compute/one"]);
    }

    #[tokio::test]
    async fn test_resolve_multiple_selector_skips_unready() {
        let mut first = ready(linked("first"));
        first.labels_mut().insert("team".to_string(), "a".to_string());
        let mut skipped = linked("skipped");
        skipped.labels_mut().insert("team".to_string(), "a".to_string());
        let reader = MemoryObjectReader::default().with(&first).with(&skipped);

        let resp = resolve_multiple(
            &reader,
            MultiResolutionRequest {
                current_values: Vec::new(),
                references: Vec::new(),
                selector: Some(team_selector()),
                controller_uid: None,
                extract: self_link,
                field_path: "spec.forProvider.networks",
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.resolved_values, vec!["https://compute/first"]);
        assert_eq!(resp.resolved_references, vec![Reference::new("first")]);
    }

    #[tokio::test]
    async fn test_resolve_multiple_selector_overwrites_current_values() {
        let mut vpc = ready(linked("vpc"));
        vpc.labels_mut().insert("team".to_string(), "a".to_string());
        let reader = MemoryObjectReader::default().with(&vpc);

        let resp = resolve_multiple(
            &reader,
            MultiResolutionRequest {
                current_values: vec!["stale-manual".to_string()],
                references: Vec::new(),
                selector: Some(team_selector()),
                controller_uid: None,
                extract: self_link,
                field_path: "spec.forProvider.networks",
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.resolved_values, vec!["https://compute/vpc"]);
        assert_eq!(resp.resolved_references, vec![Reference::new("vpc")]);
    }
}
