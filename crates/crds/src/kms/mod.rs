//! Cloud KMS resources (kms.gcp.crossplane.io)

pub mod cryptokey;
pub mod cryptokey_policy;
pub mod keyring;

pub use cryptokey::*;
pub use cryptokey_policy::*;
pub use keyring::*;
