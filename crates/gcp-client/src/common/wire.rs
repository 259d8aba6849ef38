//! Google API JSON conventions
//!
//! Models serialize every field. Before a request body is sent, zero values
//! (`""`, `0`, `false`, `null`, `[]`, `{}`) are dropped, the way Google's
//! generated clients omit empty fields. A struct keeps a zero value on the
//! wire by naming the field (JSON name) in its `forceSendFields` list, which
//! is itself never sent.
//!
//! The same normalization with force-send lists ignored gives the structural
//! comparison used to decide whether a resource is up to date: empty and
//! absent compare equal.

use serde::Serialize;
use serde_json::{Map, Value};

/// JSON key under which models carry their force-send list
pub const FORCE_SEND_FIELDS: &str = "forceSendFields";

/// Serialize a model into its request body
pub fn to_wire<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    Ok(normalize(serde_json::to_value(value)?, true))
}

/// Whether two models are equal once zero values and force-send lists are
/// disregarded
pub fn equivalent<T: Serialize>(a: &T, b: &T) -> Result<bool, serde_json::Error> {
    Ok(normalize(serde_json::to_value(a)?, false) == normalize(serde_json::to_value(b)?, false))
}

/// Whether a JSON value is the zero value of its type
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn normalize(value: Value, honor_force_send: bool) -> Value {
    match value {
        Value::Object(mut fields) => {
            let forced = take_force_send_fields(&mut fields);
            let kept: Map<String, Value> = fields
                .into_iter()
                .filter_map(|(key, field)| {
                    let field = normalize(field, honor_force_send);
                    let keep = !is_zero(&field) || (honor_force_send && forced.contains(&key));
                    keep.then_some((key, field))
                })
                .collect();
            Value::Object(kept)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize(item, honor_force_send))
                .collect(),
        ),
        other => other,
    }
}

fn take_force_send_fields(fields: &mut Map<String, Value>) -> Vec<String> {
    match fields.remove(FORCE_SEND_FIELDS) {
        Some(Value::Array(names)) => names
            .into_iter()
            .filter_map(|n| n.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Add a field to a force-send list once
pub fn force_send(list: &mut Vec<String>, field: &str) {
    if !list.iter().any(|f| f == field) {
        list.push(field.to_string());
    }
}

/// `int64` fields travel as JSON strings; accept both forms, emit numbers
pub mod int64 {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    /// Serialize as a JSON number
    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*value)
    }

    /// Deserialize from a JSON number, numeric string, or null
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(0),
            Some(Repr::Number(n)) => Ok(n),
            Some(Repr::Text(s)) if s.is_empty() => Ok(0),
            Some(Repr::Text(s)) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// `uint64` fields travel as JSON strings; accept both forms, emit numbers
pub mod uint64 {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    /// Serialize as a JSON number
    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*value)
    }

    /// Deserialize from a JSON number, numeric string, or null
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(0),
            Some(Repr::Number(n)) => Ok(n),
            Some(Repr::Text(s)) if s.is_empty() => Ok(0),
            Some(Repr::Text(s)) => s.parse().map_err(de::Error::custom),
        }
    }
}
