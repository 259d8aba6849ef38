//! Cloud KMS translation

pub mod cryptokey;
pub mod cryptokey_policy;
pub mod keyring;
