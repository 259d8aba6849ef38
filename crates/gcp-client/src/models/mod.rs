//! Google Cloud API models
//!
//! These models match the JSON resources of each REST API. Scalars are plain
//! values; a zero value means "unset" and is omitted on the wire unless the
//! field is named in `force_send_fields`.

pub mod compute;
pub mod iam;
pub mod kms;
pub mod pubsub;
pub mod secretmanager;
pub mod sqladmin;

pub use compute::*;
pub use iam::*;
pub use kms::*;
pub use pubsub::*;
pub use secretmanager::*;
pub use sqladmin::*;
