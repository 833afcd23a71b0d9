//! Generic value model for decoded request/response payloads.
//!
//! Every payload that reaches the redactor is expressed as a [`Value`]: a
//! closed recursive variant of [`Scalar`], [`Mapping`] and sequence. The shape
//! is decided once at the decode boundary, so traversal code matches on a
//! fixed set of variants instead of inspecting types at runtime.
//!
//! Integers are normalized on the way in: any non-negative integer that fits
//! in an `i64` is stored as [`Scalar::Int`], so a value decoded from JSON and
//! a value converted from `serde_json::Value` compare equal.
//!
//! JSON numbers that do not fit a 64-bit integer, and every JSON decimal, are
//! kept as their source text in [`Scalar::Number`]. serde_json is built with
//! `arbitrary_precision`, which hands such numbers over as a one-entry map
//! keyed by [`JSON_NUMBER_TOKEN`]; the same struct is emitted on output so the
//! text is written back verbatim.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed mapping.
///
/// Key order carries no meaning; a `BTreeMap` keeps rendered output stable.
pub type Mapping = BTreeMap<String, Value>;

/// Struct name and field key serde_json uses for numbers it keeps as text.
pub const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// Non-container leaf value, including null.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Number kept as its JSON source text.
    Number(String),
    String(String),
}

impl Scalar {
    /// Build an unsigned scalar, preferring `Int` when the value fits.
    pub fn from_u64(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Scalar::Int(i),
            Err(_) => Scalar::UInt(v),
        }
    }

    /// Build a scalar from JSON number text.
    ///
    /// Text that round-trips through `i64` or `u64` becomes an integer;
    /// anything else (decimals, exponents, wide integers, `-0`) is kept
    /// verbatim.
    pub fn from_number_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if let Ok(i) = text.parse::<i64>() {
            if i.to_string() == text {
                return Scalar::Int(i);
            }
        }
        if let Ok(u) = text.parse::<u64>() {
            if u.to_string() == text {
                return Scalar::UInt(u);
            }
        }
        Scalar::Number(text)
    }

    /// Short name of the scalar kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) | Scalar::UInt(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Number(_) => "number",
            Scalar::String(_) => "string",
        }
    }
}

/// A decoded payload node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Vec<Value>),
}

impl Value {
    /// The null scalar.
    pub const fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// A string scalar.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Short name of the node kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(s) => s.kind(),
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
        }
    }

    /// Maximum nesting depth; scalars have depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Value::Scalar(_) => 0,
            Value::Mapping(m) => 1 + m.values().map(Value::depth).max().unwrap_or(0),
            Value::Sequence(items) => 1 + items.iter().map(Value::depth).max().unwrap_or(0),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Scalar(Scalar::from_u64(u))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => b.into(),
            serde_json::Value::Number(n) => {
                Value::Scalar(Scalar::from_number_text(n.to_string()))
            }
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Scalar(Scalar::Null) => serde_json::Value::Null,
            Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(b),
            Value::Scalar(Scalar::Int(i)) => serde_json::Value::Number(i.into()),
            Value::Scalar(Scalar::UInt(u)) => serde_json::Value::Number(u.into()),
            // Non-finite floats have no JSON form.
            Value::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Scalar(Scalar::Number(text)) => match text.parse::<serde_json::Number>() {
                Ok(n) => serde_json::Value::Number(n),
                Err(_) => serde_json::Value::String(text),
            },
            Value::Scalar(Scalar::String(s)) => serde_json::Value::String(s),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Mapping(map) => {
                serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Value::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Value::Scalar(Scalar::Int(i)) => serializer.serialize_i64(*i),
            Value::Scalar(Scalar::UInt(u)) => serializer.serialize_u64(*u),
            Value::Scalar(Scalar::Float(f)) => serializer.serialize_f64(*f),
            Value::Scalar(Scalar::Number(text)) => {
                let mut number = serializer.serialize_struct(JSON_NUMBER_TOKEN, 1)?;
                number.serialize_field(JSON_NUMBER_TOKEN, text)?;
                number.end()
            }
            Value::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Value::Sequence(items) => serializer.collect_seq(items),
            Value::Mapping(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, a string-keyed mapping, or a sequence")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::null())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Mapping::new();
        match access.next_key::<String>()? {
            Some(key) if key == JSON_NUMBER_TOKEN => {
                let text: String = access.next_value()?;
                return Ok(Value::Scalar(Scalar::from_number_text(text)));
            }
            Some(key) => {
                map.insert(key, access.next_value()?);
            }
            None => return Ok(Value::Mapping(map)),
        }
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Mapping(map))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// Build a [`Mapping`] from key/value pairs.
///
/// ```
/// use rf_common::value::{mapping, Value};
///
/// let m = mapping([("user", Value::from("alice")), ("age", Value::from(30i64))]);
/// assert_eq!(m.len(), 2);
/// ```
pub fn mapping<K, I>(entries: I) -> Mapping
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
