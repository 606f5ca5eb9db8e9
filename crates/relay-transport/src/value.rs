//! Values exchanged with relay nodes.
//!
//! Nodes accept and return loosely typed data: sensor readings, flags, raw
//! image buffers, nested parameter sets. [`Value`] covers exactly those kinds.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// String-keyed, insertion-ordered mapping of values.
pub type Map = IndexMap<String, Value>;

/// A value passed to or returned from a node.
///
/// Every value carries its variant, so byte buffers and integer lists stay
/// distinguishable on the wire. In JSON that reads `{"int": 3}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
    List(Vec<Value>),
    Map(Map),
}

impl Value {
    /// Wraps a raw byte buffer.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

/// Converts plain JSON, as typed on a command line or read from a file.
///
/// Numbers that fit an `i64` become [`Value::Int`], everything else numeric
/// becomes [`Value::Float`]. JSON has no byte type, so arrays always map to
/// [`Value::List`].
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Self::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Renders a value as plain JSON for display. Byte buffers become arrays of
/// numbers and non-finite floats become `null`.
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Bytes(b) => serde_json::Value::from(b),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_encoding() {
        let encoded = serde_json::to_value(Value::Int(3)).unwrap();
        assert_eq!(encoded, json!({"int": 3}));

        let encoded = serde_json::to_value(Value::List(vec![Value::Null])).unwrap();
        assert_eq!(encoded, json!({"list": ["null"]}));

        let parsed: Value = serde_json::from_str(r#"{"map": {"seed": {"int": 7}}}"#).unwrap();
        assert_eq!(parsed.as_map().map(|m| m["seed"].clone()), Some(Value::Int(7)));
    }

    #[test]
    fn test_bytes_and_int_list_stay_distinct() {
        let bytes = Value::bytes(vec![1u8, 2, 3]);
        let list = Value::List(vec![1.into(), 2.into(), 3.into()]);

        let bytes_back: Value =
            serde_json::from_str(&serde_json::to_string(&bytes).unwrap()).unwrap();
        let list_back: Value =
            serde_json::from_str(&serde_json::to_string(&list).unwrap()).unwrap();

        assert_eq!(bytes_back.as_bytes(), Some(&[1u8, 2, 3][..]));
        assert_eq!(list_back.as_list().map(<[Value]>::len), Some(3));
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({
            "isRandom": true,
            "rackNum": 2,
            "rackPosXMin": 5.5,
            "racks": [],
        }));

        let map = value.as_map().unwrap();
        assert_eq!(map["isRandom"].as_bool(), Some(true));
        assert_eq!(map["rackNum"].as_i64(), Some(2));
        assert_eq!(map["rackPosXMin"].as_f64(), Some(5.5));
        assert_eq!(map["racks"].as_list(), Some(&[][..]));
        // Insertion order follows the JSON object.
        assert_eq!(map.get_index(0).map(|(k, _)| k.as_str()), Some("isRandom"));
    }

    #[test]
    fn test_to_plain_json() {
        let mut map = Map::new();
        map.insert("pose".to_string(), Value::List(vec![1.5.into(), 2.into()]));
        map.insert("nan".to_string(), Value::Float(f64::NAN));

        let json: serde_json::Value = Value::Map(map).into();
        assert_eq!(json, json!({"pose": [1.5, 2], "nan": null}));
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let value = Value::from("lidar");
        assert_eq!(value.as_str(), Some("lidar"));
        assert!(value.as_i64().is_none());
        assert!(value.as_bytes().is_none());
        assert!(!value.is_null());
        assert!(Value::default().is_null());
    }
}
