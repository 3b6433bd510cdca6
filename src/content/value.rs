//! Dynamically typed values produced by decoding structured documents.
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed mapping of decoded values.
pub type Mapping = BTreeMap<String, Value>;

/// A decoded value of any shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

/// Numeric value. Integers that fit in `i64` are always `Int`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(n) => Some(n),
            Self::UInt(_) | Self::Float(_) => None,
        }
    }
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Int(n) if n >= 0 => Some(n as u64),
            Self::UInt(n) => Some(n),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(n) => n as f64,
            Self::UInt(n) => n as f64,
            Self::Float(n) => n,
        }
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        if n <= i64::MAX as u64 {
            Self::Int(n as i64)
        } else {
            Self::UInt(n)
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => n.fmt(f),
            Self::UInt(n) => n.fmt(f),
            Self::Float(n) => n.fmt(f),
        }
    }
}

impl Value {
    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
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
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }
    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }
    /// Look up a key, `None` unless this is a mapping containing it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(Number::Int(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(Number::Float(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(seq: Vec<Value>) -> Self {
        Self::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use std::fmt;

    use serde::de::{self, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
    use serde::ser::{SerializeMap, SerializeSeq};

    use super::{Mapping, Number, Value};

    impl serde::Serialize for Value {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Value::Null => serializer.serialize_unit(),
                Value::Bool(b) => serializer.serialize_bool(*b),
                Value::Number(Number::Int(n)) => serializer.serialize_i64(*n),
                Value::Number(Number::UInt(n)) => serializer.serialize_u64(*n),
                Value::Number(Number::Float(n)) => serializer.serialize_f64(*n),
                Value::String(s) => serializer.serialize_str(s),
                Value::Sequence(seq) => {
                    let mut out = serializer.serialize_seq(Some(seq.len()))?;
                    for item in seq {
                        out.serialize_element(item)?;
                    }
                    out.end()
                }
                Value::Mapping(mapping) => {
                    let mut out = serializer.serialize_map(Some(mapping.len()))?;
                    for (key, value) in mapping {
                        out.serialize_entry(key, value)?;
                    }
                    out.end()
                }
            }
        }
    }

    const MERGE_KEY: &str = "<<";

    /// Fold the value of a `<<` key into `merged`. Keys already present win,
    /// so in a sequence of mappings the first one listed takes precedence.
    fn merge<E: de::Error>(merged: &mut Mapping, value: Value) -> Result<(), E> {
        match value {
            Value::Mapping(mapping) => {
                for (key, value) in mapping {
                    merged.entry(key).or_insert(value);
                }
                Ok(())
            }
            Value::Sequence(seq) => seq.into_iter().try_for_each(|item| match item {
                Value::Mapping(_) => merge(merged, item),
                other => Err(E::custom(format!(
                    "merge sequence must contain mappings, found {}",
                    other.kind()
                ))),
            }),
            other => Err(E::custom(format!(
                "merge value must be a mapping or a sequence of mappings, found {}",
                other.kind()
            ))),
        }
    }

    struct ValueVisitor;

    impl<'de> Visitor<'de> for ValueVisitor {
        type Value = Value;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("any structured value")
        }
        fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
            Ok(Value::Bool(b))
        }
        fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
            Ok(Value::Number(Number::Int(n)))
        }
        fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
            Ok(Value::Number(Number::from(n)))
        }
        // Integers outside the 64 bit range degrade to floats.
        fn visit_i128<E: de::Error>(self, n: i128) -> Result<Value, E> {
            Ok(Value::Number(Number::Float(n as f64)))
        }
        fn visit_u128<E: de::Error>(self, n: u128) -> Result<Value, E> {
            Ok(Value::Number(Number::Float(n as f64)))
        }
        fn visit_f64<E: de::Error>(self, n: f64) -> Result<Value, E> {
            Ok(Value::Number(Number::Float(n)))
        }
        fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
            Ok(Value::String(s.to_string()))
        }
        fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
            Ok(Value::String(s))
        }
        fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
            Ok(Value::Null)
        }
        fn visit_none<E: de::Error>(self) -> Result<Value, E> {
            Ok(Value::Null)
        }
        fn visit_some<D: serde::Deserializer<'de>>(self, d: D) -> Result<Value, D::Error> {
            serde::Deserialize::deserialize(d)
        }
        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
            let mut seq = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(item) = access.next_element()? {
                seq.push(item);
            }
            Ok(Value::Sequence(seq))
        }
        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
            let mut mapping = Mapping::new();
            let mut merged = Mapping::new();
            while let Some(Key(key)) = access.next_key()? {
                if key == MERGE_KEY {
                    merge::<A::Error>(&mut merged, access.next_value()?)?;
                    continue;
                }
                if mapping.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate key `{}`", key)));
                }
                let value = access.next_value()?;
                mapping.insert(key, value);
            }
            for (key, value) in merged {
                mapping.entry(key).or_insert(value);
            }
            Ok(Value::Mapping(mapping))
        }
        // Tagged nodes (`!tag value`) keep their value, the tag is dropped.
        fn visit_enum<A: EnumAccess<'de>>(self, access: A) -> Result<Value, A::Error> {
            let (_tag, variant): (String, _) = access.variant()?;
            variant.newtype_variant()
        }
    }

    impl<'de> serde::Deserialize<'de> for Value {
        fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Value, D::Error> {
            d.deserialize_any(ValueVisitor)
        }
    }

    /// Mapping key: any scalar, stored in its textual form.
    struct Key(String);

    struct KeyVisitor;

    impl<'de> Visitor<'de> for KeyVisitor {
        type Value = Key;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a scalar mapping key")
        }
        fn visit_bool<E: de::Error>(self, b: bool) -> Result<Key, E> {
            Ok(Key(b.to_string()))
        }
        fn visit_i64<E: de::Error>(self, n: i64) -> Result<Key, E> {
            Ok(Key(n.to_string()))
        }
        fn visit_u64<E: de::Error>(self, n: u64) -> Result<Key, E> {
            Ok(Key(n.to_string()))
        }
        fn visit_i128<E: de::Error>(self, n: i128) -> Result<Key, E> {
            Ok(Key((n as f64).to_string()))
        }
        fn visit_u128<E: de::Error>(self, n: u128) -> Result<Key, E> {
            Ok(Key((n as f64).to_string()))
        }
        fn visit_f64<E: de::Error>(self, n: f64) -> Result<Key, E> {
            Ok(Key(n.to_string()))
        }
        fn visit_str<E: de::Error>(self, s: &str) -> Result<Key, E> {
            Ok(Key(s.to_string()))
        }
        fn visit_string<E: de::Error>(self, s: String) -> Result<Key, E> {
            Ok(Key(s))
        }
        fn visit_unit<E: de::Error>(self) -> Result<Key, E> {
            Ok(Key("null".to_string()))
        }
        fn visit_none<E: de::Error>(self) -> Result<Key, E> {
            Ok(Key("null".to_string()))
        }
    }

    impl<'de> serde::Deserialize<'de> for Key {
        fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Key, D::Error> {
            d.deserialize_any(KeyVisitor)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut mapping = Mapping::new();
        mapping.insert("name".to_string(), Value::from("pingd"));
        mapping.insert("port".to_string(), Value::from(8080_i64));
        mapping.insert("ratio".to_string(), Value::from(0.5_f64));
        mapping.insert("debug".to_string(), Value::from(false));
        let value = Value::from(mapping);

        assert_eq!(value.kind(), "mapping");
        assert_eq!(value.get("name").and_then(Value::as_str), Some("pingd"));
        assert_eq!(value.get("port").and_then(Value::as_i64), Some(8080));
        assert_eq!(value.get("port").and_then(Value::as_u64), Some(8080));
        assert_eq!(value.get("ratio").and_then(Value::as_f64), Some(0.5));
        assert_eq!(value.get("debug").and_then(Value::as_bool), Some(false));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::Null.get("name"), None);
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_number_normalization() {
        assert_eq!(Number::from(7u64), Number::Int(7));
        assert_eq!(Number::from(u64::MAX), Number::UInt(u64::MAX));
        assert_eq!(Number::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Number::Int(-1).as_u64(), None);
        assert_eq!(Number::Float(2.5).to_string(), "2.5");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_value_serializes_as_json() {
        let mut mapping = Mapping::new();
        mapping.insert(
            "items".to_string(),
            Value::from(vec![Value::from(1_i64), Value::Null, Value::from("x")]),
        );
        let json = serde_json::to_string(&Value::from(mapping)).unwrap();
        assert_eq!(json, r#"{"items":[1,null,"x"]}"#);
    }
}
