//! Translation between managed resource parameters and GCP wire models
//!
//! Every kind has the same set of pure functions:
//!
//! - `generate_*` writes the parameters into a provider object. `None`
//!   becomes the zero value, which the wire layer omits; zero values that
//!   must reach the API are listed in `force_send_fields`.
//! - `generate_*_observation` extracts the observation from a provider object.
//! - `late_initialize_*` adopts non-zero provider values into unset
//!   parameters and never overwrites a set one.
//! - `is_*_up_to_date` generates onto a copy of the observed object and
//!   compares the two after wire normalization.

pub mod compute;
pub mod database;
pub mod iam;
pub mod kms;
pub mod pubsub;
pub mod secretsmanager;

use gcp_client::common::wire;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Adopt a non-empty provider string into an unset field
pub fn late_init_string(field: &mut Option<String>, observed: &str) {
    if field.is_none() && !observed.is_empty() {
        *field = Some(observed.to_string());
    }
}

/// Adopt a provider `true` into an unset field; `false` is the zero value
pub fn late_init_bool(field: &mut Option<bool>, observed: bool) {
    if field.is_none() && observed {
        *field = Some(true);
    }
}

/// Adopt a non-zero provider number into an unset field
pub fn late_init_i64(field: &mut Option<i64>, observed: i64) {
    if field.is_none() && observed != 0 {
        *field = Some(observed);
    }
}

/// Adopt a non-empty provider list into an unset field
pub fn late_init_vec<T: Clone>(field: &mut Option<Vec<T>>, observed: &[T]) {
    if field.is_none() && !observed.is_empty() {
        *field = Some(observed.to_vec());
    }
}

/// Adopt a non-empty provider map into an unset field
pub fn late_init_map(field: &mut Option<BTreeMap<String, String>>, observed: &BTreeMap<String, String>) {
    if field.is_none() && !observed.is_empty() {
        *field = Some(observed.clone());
    }
}

/// Late-initialize a nested parameter struct from its provider counterpart
///
/// An unset struct is only created when `fill` adopts at least one value.
pub fn late_init_nested<T, O>(field: &mut Option<T>, observed: Option<&O>, fill: impl FnOnce(&mut T, &O))
where
    T: Default + PartialEq,
{
    let Some(observed) = observed else {
        return;
    };
    match field {
        Some(value) => fill(value, observed),
        None => {
            let mut value = T::default();
            fill(&mut value, observed);
            if value != T::default() {
                *field = Some(value);
            }
        }
    }
}

/// Top-level JSON fields among `fields` whose values differ on the wire
///
/// Used to build `updateMask` lists. Empty and absent compare equal.
pub fn differing_fields<T: Serialize>(desired: &T, observed: &T, fields: &[&str]) -> Result<Vec<String>, serde_json::Error> {
    let desired = serde_json::to_value(desired)?;
    let observed = serde_json::to_value(observed)?;
    let mut changed = Vec::new();
    for field in fields {
        let want = desired.get(field).unwrap_or(&Value::Null);
        let have = observed.get(field).unwrap_or(&Value::Null);
        if !wire::equivalent(want, have)? {
            changed.push((*field).to_string());
        }
    }
    Ok(changed)
}

/// Last `/`-separated segment of a resource name or URL
pub fn last_segment(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_late_init_never_overwrites() {
        let mut set = Some("mine".to_string());
        late_init_string(&mut set, "theirs");
        assert_eq!(set.as_deref(), Some("mine"));

        let mut unset = None;
        late_init_string(&mut unset, "theirs");
        assert_eq!(unset.as_deref(), Some("theirs"));

        let mut empty = None;
        late_init_string(&mut empty, "");
        assert!(empty.is_none());
    }

    #[test]
    fn test_late_init_bool_ignores_false() {
        let mut flag = None;
        late_init_bool(&mut flag, false);
        assert!(flag.is_none());
        late_init_bool(&mut flag, true);
        assert_eq!(flag, Some(true));

        let mut explicit = Some(false);
        late_init_bool(&mut explicit, true);
        assert_eq!(explicit, Some(false));
    }

    #[test]
    fn test_late_init_nested_only_creates_non_empty() {
        #[derive(Debug, Default, PartialEq)]
        struct Window {
            hour: Option<i64>,
        }

        let mut unset: Option<Window> = None;
        late_init_nested(&mut unset, Some(&0_i64), |w, o| late_init_i64(&mut w.hour, *o));
        assert!(unset.is_none());

        late_init_nested(&mut unset, Some(&4_i64), |w, o| late_init_i64(&mut w.hour, *o));
        assert_eq!(unset, Some(Window { hour: Some(4) }));
    }

    #[test]
    fn test_differing_fields_treats_empty_as_absent() {
        let desired = json!({"labels": {}, "displayName": "new", "description": ""});
        let observed = json!({"displayName": "old"});
        let changed = differing_fields(&desired, &observed, &["labels", "displayName", "description"]).unwrap();
        assert_eq!(changed, vec!["displayName".to_string()]);
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("projects/p/secrets/s/versions/3"), "3");
        assert_eq!(last_segment("plain"), "plain");
    }
}
