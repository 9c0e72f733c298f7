use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;
use serde_core::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};

use crate::value::normalize_float;

// -----------------------------------------------------------------------------
// Untyped

/// A generically decoded JSON value with exact integer variants.
///
/// Decoding never produces an integral [`Float`](Untyped::Float): integers
/// are kept exact and integral floating values are narrowed the same way
/// [`normalize`](crate::value::normalize) does.
///
/// # Examples
///
/// ```
/// use jb_bind::value::Untyped;
///
/// let value: Untyped = serde_json::from_str(r#"{"a": 1, "b": 2.0, "c": 2.5}"#).unwrap();
/// assert_eq!(value.get("a"), Some(&Untyped::Int(1)));
/// assert_eq!(value.get("b"), Some(&Untyped::Int(2)));
/// assert_eq!(value.get("c"), Some(&Untyped::Float(2.5)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Untyped {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f64),
    String(String),
    List(Vec<Untyped>),
    Map(IndexMap<String, Untyped>),
}

impl Untyped {
    /// Converts a JSON tree, narrowing numbers.
    pub fn from_json(tree: &Value) -> Self {
        match tree {
            Value::Null => Untyped::Null,
            Value::Bool(val) => Untyped::Bool(*val),
            Value::Number(num) => Self::from_number(num),
            Value::String(val) => Untyped::String(val.clone()),
            Value::Array(items) => Untyped::List(items.iter().map(Self::from_json).collect()),
            Value::Object(entries) => Untyped::Map(
                entries
                    .iter()
                    .map(|(key, val)| (key.clone(), Self::from_json(val)))
                    .collect(),
            ),
        }
    }

    /// Converts back into a JSON tree. Non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Untyped::Null => Value::Null,
            Untyped::Bool(val) => Value::Bool(*val),
            Untyped::Int(val) => Value::from(*val),
            Untyped::Long(val) => Value::from(*val),
            Untyped::Float(val) => Number::from_f64(*val).map_or(Value::Null, Value::Number),
            Untyped::String(val) => Value::String(val.clone()),
            Untyped::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Untyped::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, val)| (key.clone(), val.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    fn from_number(num: &Number) -> Self {
        if let Some(val) = num.as_i64() {
            from_i64(val)
        } else {
            // u64 above i64::MAX, or a float
            normalize_float(num.as_f64().unwrap_or(f64::NAN))
        }
    }

    /// Looks up `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Untyped> {
        match self {
            Untyped::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Untyped::Null)
    }

    /// Widens `Int` and `Long` to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Untyped::Int(val) => Some(i64::from(*val)),
            Untyped::Long(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Untyped::String(val) => Some(val),
            _ => None,
        }
    }
}

fn from_i64(val: i64) -> Untyped {
    match i32::try_from(val) {
        Ok(narrow) => Untyped::Int(narrow),
        Err(_) => Untyped::Long(val),
    }
}

impl From<&Value> for Untyped {
    #[inline]
    fn from(tree: &Value) -> Self {
        Self::from_json(tree)
    }
}

impl From<&Untyped> for Value {
    #[inline]
    fn from(value: &Untyped) -> Self {
        value.to_json()
    }
}

// -----------------------------------------------------------------------------
// Serde

impl Serialize for Untyped {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Untyped::Null => serializer.serialize_unit(),
            Untyped::Bool(val) => serializer.serialize_bool(*val),
            Untyped::Int(val) => serializer.serialize_i32(*val),
            Untyped::Long(val) => serializer.serialize_i64(*val),
            Untyped::Float(val) => serializer.serialize_f64(*val),
            Untyped::String(val) => serializer.serialize_str(val),
            Untyped::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Untyped::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, val) in entries {
                    map.serialize_entry(key, val)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Untyped {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UntypedVisitor)
    }
}

struct UntypedVisitor;

impl<'de> Visitor<'de> for UntypedVisitor {
    type Value = Untyped;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, val: bool) -> Result<Untyped, E> {
        Ok(Untyped::Bool(val))
    }

    fn visit_i64<E: de::Error>(self, val: i64) -> Result<Untyped, E> {
        Ok(from_i64(val))
    }

    fn visit_u64<E: de::Error>(self, val: u64) -> Result<Untyped, E> {
        match i64::try_from(val) {
            Ok(val) => Ok(from_i64(val)),
            Err(_) => Ok(Untyped::Float(val as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, val: f64) -> Result<Untyped, E> {
        Ok(normalize_float(val))
    }

    fn visit_str<E: de::Error>(self, val: &str) -> Result<Untyped, E> {
        Ok(Untyped::String(String::from(val)))
    }

    fn visit_string<E: de::Error>(self, val: String) -> Result<Untyped, E> {
        Ok(Untyped::String(val))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Untyped, E> {
        Ok(Untyped::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Untyped, E> {
        Ok(Untyped::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Untyped, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Untyped, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Untyped::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Untyped, A::Error> {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, val)) = map.next_entry::<String, Untyped>()? {
            entries.insert(key, val);
        }
        Ok(Untyped::Map(entries))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Untyped;

    #[test]
    fn decode_narrows_numbers() {
        let value: Untyped =
            serde_json::from_value(json!({"x": 10.0, "y": 12.5, "z": 100000000000_i64, "w": 7}))
                .unwrap();
        assert_eq!(value.get("x"), Some(&Untyped::Int(10)));
        assert_eq!(value.get("y"), Some(&Untyped::Float(12.5)));
        assert_eq!(value.get("z"), Some(&Untyped::Long(100000000000)));
        assert_eq!(value.get("w"), Some(&Untyped::Int(7)));
    }

    #[test]
    fn from_json_matches_deserialize() {
        let tree = json!([1, 2.0, [3.5, {"k": null}], "s", true]);
        let via_serde: Untyped = serde_json::from_value(tree.clone()).unwrap();
        assert_eq!(Untyped::from_json(&tree), via_serde);
    }

    #[test]
    fn to_json_keeps_order() {
        let value = Untyped::from_json(&json!({"b": 1, "a": 2}));
        let text = serde_json::to_string(&value.to_json()).unwrap();
        assert_eq!(text, r#"{"b":1,"a":2}"#);
        assert_eq!(serde_json::to_string(&value).unwrap(), text);
    }
}
