//! Cloud KMS v1 models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key ring
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyRing {
    pub name: String,
    pub create_time: String,
}

/// Crypto key
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CryptoKey {
    pub name: String,
    pub purpose: String,
    pub rotation_period: String,
    pub next_rotation_time: String,
    pub version_template: Option<CryptoKeyVersionTemplate>,
    pub labels: BTreeMap<String, String>,
    pub primary: Option<CryptoKeyVersion>,
    pub create_time: String,
}

/// Template for new key versions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CryptoKeyVersionTemplate {
    pub protection_level: String,
    pub algorithm: String,
}

/// Key version
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CryptoKeyVersion {
    pub name: String,
    pub state: String,
    pub protection_level: String,
    pub algorithm: String,
    pub create_time: String,
}

/// IAM policy attached to a resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Policy {
    pub bindings: Vec<Binding>,
    pub etag: String,
    pub version: i64,
}

/// Role granted to members
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Binding {
    pub role: String,
    pub members: Vec<String>,
    pub condition: Option<Expr>,
}

/// CEL condition of a binding
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Expr {
    pub expression: String,
    pub title: String,
    pub description: String,
    pub location: String,
}
