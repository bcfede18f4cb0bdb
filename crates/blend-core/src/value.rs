//! The value model blended by the engine
//!
//! A [`Value`] is a closed tagged variant. Only [`Value::Record`] is ever
//! recursed into; [`Value::Sequence`] is recognised so strategies can treat
//! arrays specially, and the other containers ([`Value::Set`],
//! [`Value::Map`]) are opaque and merge like scalars.
//!
//! Absent keys are not values: the engine passes `Option<&Value>` around and
//! `None` stands for a key missing from one side of the merge.
//!
//! # Examples
//!
//! ```
//! use blend_core::Value;
//! use serde_json::json;
//!
//! let value = Value::from(json!({"a": 1, "b": [1, 2]}));
//! assert!(value.is_record());
//! assert!(value.get("b").is_some_and(Value::is_sequence));
//! ```

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;
use std::fmt;

/// Ordered mapping from property key to value
pub type Record = IndexMap<String, Value>;

/// Key used by the `toml` deserializer to smuggle datetimes through serde
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// A node in a tree being blended
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered sequence (array)
    Sequence(Vec<Value>),
    /// Keyed record, the only shape the engine recurses into
    Record(Record),
    /// Set container; never merged element-wise
    Set(Vec<Value>),
    /// Keyed map container with arbitrary keys; never merged entry-wise
    Map(Vec<(Value, Value)>),
}

/// Variant tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Record,
    Set,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Record => "record",
            Self::Set => "set",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Record(_) => ValueKind::Record,
            Self::Set(_) => ValueKind::Set,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// True only for keyed records; sequences, sets and maps are excluded.
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// True only for ordered sequences.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key when this value is a record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_record().and_then(|record| record.get(key))
    }
}

/// True when a slot is absent or explicitly null.
pub fn is_nullish(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

/// `primary` unless it is nullish, in which case `fallback`.
///
/// An explicit null is kept over an absent fallback, so a key present on
/// either side always resolves to some value.
pub fn coalesce<'a>(primary: Option<&'a Value>, fallback: Option<&'a Value>) -> Option<&'a Value> {
    match primary {
        Some(value) if !value.is_null() => primary,
        _ => fallback.or(primary),
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Record(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = Error;

    /// Sets become arrays. Maps become objects only when every key is a string.
    fn try_from(value: Value) -> Result<Self> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Sequence(items) | Value::Set(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_>>()?,
            ),
            Value::Record(record) => serde_json::Value::Object(
                record
                    .into_iter()
                    .map(|(k, v)| Ok((k, serde_json::Value::try_from(v)?)))
                    .collect::<Result<_>>()?,
            ),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| match k {
                        Value::String(key) => Ok((key, serde_json::Value::try_from(v)?)),
                        other => Err(Error::unsupported(format!(
                            "map key of kind {} cannot become a JSON object key",
                            other.kind()
                        ))),
                    })
                    .collect::<Result<_>>()?,
            ),
        })
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) | Value::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (k, v) in record {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any structured value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    /// String-keyed maps become records; anything else is kept as an opaque map.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<Value, Value>()? {
            entries.push((key, value));
        }

        if let [(Value::String(key), Value::String(datetime))] = entries.as_slice() {
            if key == TOML_DATETIME_KEY {
                return Ok(Value::String(datetime.clone()));
            }
        }

        if entries.iter().all(|(k, _)| matches!(k, Value::String(_))) {
            let record = entries
                .into_iter()
                .filter_map(|(k, v)| match k {
                    Value::String(key) => Some((key, v)),
                    _ => None,
                })
                .collect();
            Ok(Value::Record(record))
        } else {
            Ok(Value::Map(entries))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capability_predicates() {
        assert!(Value::from(json!({"a": 1})).is_record());
        assert!(!Value::from(json!([1, 2])).is_record());
        assert!(Value::from(json!([1, 2])).is_sequence());
        assert!(!Value::Set(vec![Value::from(1_i64)]).is_record());
        assert!(!Value::Set(vec![]).is_sequence());
        assert!(!Value::Map(vec![]).is_record());
        assert!(!Value::Null.is_record());
        assert!(!Value::from("text").is_sequence());
    }

    #[test]
    fn test_nullish_and_coalesce() {
        let one = Value::from(1_i64);
        assert!(is_nullish(None));
        assert!(is_nullish(Some(&Value::Null)));
        assert!(!is_nullish(Some(&one)));

        assert_eq!(coalesce(Some(&Value::Null), Some(&one)), Some(&one));
        assert_eq!(coalesce(None, None), None);
        assert_eq!(coalesce(Some(&Value::Null), None), Some(&Value::Null));
        assert_eq!(coalesce(None, Some(&Value::Null)), Some(&Value::Null));
        assert_eq!(coalesce(Some(&one), None), Some(&one));
    }

    #[test]
    fn test_map_with_non_string_keys_does_not_convert_to_json() {
        let value = Value::Map(vec![(Value::from(1_i64), Value::from("one"))]);
        let err = serde_json::Value::try_from(value).unwrap_err();
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": {"y": true, "b": null}}"#).unwrap();
        let record = value.as_record().unwrap();
        let keys: Vec<_> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(value.get("a").and_then(|a| a.get("b")), Some(&Value::Null));
    }

    #[test]
    fn test_serialize_set_as_array() {
        let value = Value::Set(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"["a","b"]"#);
    }
}
