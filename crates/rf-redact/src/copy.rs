//! Deep copy engine.
//!
//! The payload handed to the redactor is usually still live elsewhere: the
//! same request variables are being executed while they are logged. Redaction
//! therefore never touches the caller's structure. Instead the engine walks
//! the payload through serde and builds a fresh, fully owned [`Value`] tree,
//! which the redactor is then free to mutate.
//!
//! Built-in shapes are primitives, strings, options, unit, newtype wrappers,
//! sequences, tuples and maps. Maps with scalar non-string keys are accepted
//! and their keys rendered to strings (the JSON object-key convention).
//!
//! Named structs and enums are copied only when their serde type name has
//! been registered with [`CopyEngine::register`]. A structural copy of an
//! unknown concrete type is refused rather than guessed at; together with raw
//! byte buffers, 128-bit integers that do not fit 64 bits, and non-scalar map
//! keys, this surfaces as a [`CopyError`]. serde_json's text-preserving number
//! struct is built in and becomes [`Scalar::Number`].

use rf_common::value::{Mapping, Scalar, Value, JSON_NUMBER_TOKEN};
use serde::ser::{
    self, Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct,
    SerializeStructVariant, SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
    Serializer,
};
use std::collections::BTreeSet;
use std::fmt::Display;
use thiserror::Error;

/// Errors raised while copying a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CopyError {
    /// A named struct or enum that was not registered.
    #[error("type `{name}` is not registered with the copy engine")]
    Unregistered { name: String },

    /// A leaf the value model cannot represent.
    #[error("unsupported value of kind {kind}")]
    Unsupported { kind: &'static str },

    /// A map key that has no string form.
    #[error("map keys must be scalars, found {kind}")]
    UnsupportedKey { kind: &'static str },

    /// The payload did not copy into a mapping.
    #[error("payload root must be a mapping, found {kind}")]
    RootNotMapping { kind: &'static str },

    /// The payload's own `Serialize` implementation failed.
    #[error("payload serialization failed: {0}")]
    Custom(String),
}

impl ser::Error for CopyError {
    fn custom<T: Display>(msg: T) -> Self {
        CopyError::Custom(msg.to_string())
    }
}

type CopyResult<T> = std::result::Result<T, CopyError>;

/// Copies payloads into owned [`Value`] trees.
#[derive(Debug, Clone, Default)]
pub struct CopyEngine {
    registered: BTreeSet<String>,
}

impl CopyEngine {
    /// An engine that accepts only the built-in shapes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named struct or enum by its serde type name.
    pub fn register(mut self, type_name: impl Into<String>) -> Self {
        self.registered.insert(type_name.into());
        self
    }

    /// Register several type names at once.
    pub fn with_registered<I, S>(mut self, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registered.extend(type_names.into_iter().map(Into::into));
        self
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.registered.contains(type_name)
    }

    /// Registered type names in sorted order.
    pub fn registered(&self) -> impl Iterator<Item = &str> {
        self.registered.iter().map(String::as_str)
    }

    /// Copy any serializable payload into an owned value tree.
    pub fn copy_value<T>(&self, payload: &T) -> CopyResult<Value>
    where
        T: Serialize + ?Sized,
    {
        payload.serialize(ValueCopier { engine: self })
    }

    /// Copy a payload whose root must be a mapping.
    pub fn copy<T>(&self, payload: &T) -> CopyResult<Mapping>
    where
        T: Serialize + ?Sized,
    {
        match self.copy_value(payload)? {
            Value::Mapping(map) => Ok(map),
            other => Err(CopyError::RootNotMapping { kind: other.kind() }),
        }
    }

    fn check(&self, type_name: &'static str) -> CopyResult<()> {
        if self.is_registered(type_name) {
            Ok(())
        } else {
            Err(CopyError::Unregistered {
                name: type_name.to_string(),
            })
        }
    }
}

/// Serializer producing owned values.
struct ValueCopier<'a> {
    engine: &'a CopyEngine,
}

impl<'a> Serializer for ValueCopier<'a> {
    type Ok = Value;
    type Error = CopyError;

    type SerializeSeq = SeqCopier<'a>;
    type SerializeTuple = SeqCopier<'a>;
    type SerializeTupleStruct = SeqCopier<'a>;
    type SerializeTupleVariant = VariantSeqCopier<'a>;
    type SerializeMap = MapCopier<'a>;
    type SerializeStruct = MapCopier<'a>;
    type SerializeStructVariant = VariantMapCopier<'a>;

    fn serialize_bool(self, v: bool) -> CopyResult<Value> {
        Ok(v.into())
    }

    fn serialize_i8(self, v: i8) -> CopyResult<Value> {
        Ok(i64::from(v).into())
    }

    fn serialize_i16(self, v: i16) -> CopyResult<Value> {
        Ok(i64::from(v).into())
    }

    fn serialize_i32(self, v: i32) -> CopyResult<Value> {
        Ok(i64::from(v).into())
    }

    fn serialize_i64(self, v: i64) -> CopyResult<Value> {
        Ok(v.into())
    }

    fn serialize_i128(self, v: i128) -> CopyResult<Value> {
        if let Ok(i) = i64::try_from(v) {
            Ok(i.into())
        } else if let Ok(u) = u64::try_from(v) {
            Ok(u.into())
        } else {
            Err(CopyError::Unsupported { kind: "i128" })
        }
    }

    fn serialize_u8(self, v: u8) -> CopyResult<Value> {
        Ok(u64::from(v).into())
    }

    fn serialize_u16(self, v: u16) -> CopyResult<Value> {
        Ok(u64::from(v).into())
    }

    fn serialize_u32(self, v: u32) -> CopyResult<Value> {
        Ok(u64::from(v).into())
    }

    fn serialize_u64(self, v: u64) -> CopyResult<Value> {
        Ok(v.into())
    }

    fn serialize_u128(self, v: u128) -> CopyResult<Value> {
        u64::try_from(v)
            .map(Value::from)
            .map_err(|_| CopyError::Unsupported { kind: "u128" })
    }

    fn serialize_f32(self, v: f32) -> CopyResult<Value> {
        Ok(f64::from(v).into())
    }

    fn serialize_f64(self, v: f64) -> CopyResult<Value> {
        Ok(v.into())
    }

    fn serialize_char(self, v: char) -> CopyResult<Value> {
        Ok(Value::string(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> CopyResult<Value> {
        Ok(Value::string(v))
    }

    fn serialize_bytes(self, _v: &[u8]) -> CopyResult<Value> {
        Err(CopyError::Unsupported { kind: "bytes" })
    }

    fn serialize_none(self) -> CopyResult<Value> {
        Ok(Value::null())
    }

    fn serialize_some<T>(self, value: &T) -> CopyResult<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> CopyResult<Value> {
        Ok(Value::null())
    }

    fn serialize_unit_struct(self, name: &'static str) -> CopyResult<Value> {
        self.engine.check(name)?;
        Ok(Value::null())
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> CopyResult<Value> {
        self.engine.check(name)?;
        Ok(Value::string(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> CopyResult<Value>
    where
        T: ?Sized + Serialize,
    {
        // Newtype wrappers are transparent.
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> CopyResult<Value>
    where
        T: ?Sized + Serialize,
    {
        self.engine.check(name)?;
        let inner = value.serialize(ValueCopier {
            engine: self.engine,
        })?;
        let mut map = Mapping::new();
        map.insert(variant.to_string(), inner);
        Ok(Value::Mapping(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> CopyResult<SeqCopier<'a>> {
        Ok(SeqCopier::new(self.engine, len))
    }

    fn serialize_tuple(self, len: usize) -> CopyResult<SeqCopier<'a>> {
        Ok(SeqCopier::new(self.engine, Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> CopyResult<SeqCopier<'a>> {
        self.engine.check(name)?;
        Ok(SeqCopier::new(self.engine, Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> CopyResult<VariantSeqCopier<'a>> {
        self.engine.check(name)?;
        Ok(VariantSeqCopier {
            variant,
            inner: SeqCopier::new(self.engine, Some(len)),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> CopyResult<MapCopier<'a>> {
        Ok(MapCopier::new(self.engine))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> CopyResult<MapCopier<'a>> {
        if name == JSON_NUMBER_TOKEN {
            return Ok(MapCopier {
                number: true,
                ..MapCopier::new(self.engine)
            });
        }
        self.engine.check(name)?;
        Ok(MapCopier::new(self.engine))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> CopyResult<VariantMapCopier<'a>> {
        self.engine.check(name)?;
        Ok(VariantMapCopier {
            variant,
            inner: MapCopier::new(self.engine),
        })
    }
}

struct SeqCopier<'a> {
    engine: &'a CopyEngine,
    items: Vec<Value>,
}

impl<'a> SeqCopier<'a> {
    fn new(engine: &'a CopyEngine, len: Option<usize>) -> Self {
        SeqCopier {
            engine,
            items: Vec::with_capacity(len.unwrap_or(0)),
        }
    }

    fn push<T>(&mut self, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        let item = value.serialize(ValueCopier {
            engine: self.engine,
        })?;
        self.items.push(item);
        Ok(())
    }
}

impl SerializeSeq for SeqCopier<'_> {
    type Ok = Value;
    type Error = CopyError;

    fn serialize_element<T>(&mut self, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> CopyResult<Value> {
        Ok(Value::Sequence(self.items))
    }
}

impl SerializeTuple for SeqCopier<'_> {
    type Ok = Value;
    type Error = CopyError;

    fn serialize_element<T>(&mut self, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> CopyResult<Value> {
        Ok(Value::Sequence(self.items))
    }
}

impl SerializeTupleStruct for SeqCopier<'_> {
    type Ok = Value;
    type Error = CopyError;

    fn serialize_field<T>(&mut self, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> CopyResult<Value> {
        Ok(Value::Sequence(self.items))
    }
}

struct VariantSeqCopier<'a> {
    variant: &'static str,
    inner: SeqCopier<'a>,
}

impl SerializeTupleVariant for VariantSeqCopier<'_> {
    type Ok = Value;
    type Error = CopyError;

    fn serialize_field<T>(&mut self, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.push(value)
    }

    fn end(self) -> CopyResult<Value> {
        let mut map = Mapping::new();
        map.insert(self.variant.to_string(), Value::Sequence(self.inner.items));
        Ok(Value::Mapping(map))
    }
}

struct MapCopier<'a> {
    engine: &'a CopyEngine,
    map: Mapping,
    next_key: Option<String>,
    /// Collecting serde_json's number struct rather than a mapping.
    number: bool,
}

impl<'a> MapCopier<'a> {
    fn new(engine: &'a CopyEngine) -> Self {
        MapCopier {
            engine,
            map: Mapping::new(),
            next_key: None,
            number: false,
        }
    }

    fn finish_number(mut self) -> CopyResult<Value> {
        match self.map.remove(JSON_NUMBER_TOKEN) {
            Some(Value::Scalar(Scalar::String(text))) => {
                Ok(Value::Scalar(Scalar::from_number_text(text)))
            }
            _ => Err(CopyError::Custom("malformed JSON number".into())),
        }
    }

    fn insert<T>(&mut self, key: String, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(ValueCopier {
            engine: self.engine,
        })?;
        self.map.insert(key, value);
        Ok(())
    }
}

impl SerializeMap for MapCopier<'_> {
    type Ok = Value;
    type Error = CopyError;

    fn serialize_key<T>(&mut self, key: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(KeyCopier {
            engine: self.engine,
        })?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| CopyError::Custom("map value serialized before its key".into()))?;
        self.insert(key, value)
    }

    fn end(self) -> CopyResult<Value> {
        Ok(Value::Mapping(self.map))
    }
}

impl SerializeStruct for MapCopier<'_> {
    type Ok = Value;
    type Error = CopyError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> CopyResult<Value> {
        if self.number {
            return self.finish_number();
        }
        Ok(Value::Mapping(self.map))
    }
}

struct VariantMapCopier<'a> {
    variant: &'static str,
    inner: MapCopier<'a>,
}

impl SerializeStructVariant for VariantMapCopier<'_> {
    type Ok = Value;
    type Error = CopyError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> CopyResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.insert(key.to_string(), value)
    }

    fn end(self) -> CopyResult<Value> {
        let mut map = Mapping::new();
        map.insert(self.variant.to_string(), Value::Mapping(self.inner.map));
        Ok(Value::Mapping(map))
    }
}

/// Serializer rendering scalar map keys to strings.
struct KeyCopier<'a> {
    engine: &'a CopyEngine,
}

fn key_error(kind: &'static str) -> CopyError {
    CopyError::UnsupportedKey { kind }
}

impl Serializer for KeyCopier<'_> {
    type Ok = String;
    type Error = CopyError;

    type SerializeSeq = Impossible<String, CopyError>;
    type SerializeTuple = Impossible<String, CopyError>;
    type SerializeTupleStruct = Impossible<String, CopyError>;
    type SerializeTupleVariant = Impossible<String, CopyError>;
    type SerializeMap = Impossible<String, CopyError>;
    type SerializeStruct = Impossible<String, CopyError>;
    type SerializeStructVariant = Impossible<String, CopyError>;

    fn serialize_bool(self, v: bool) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> CopyResult<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> CopyResult<String> {
        Err(key_error("bytes"))
    }

    fn serialize_none(self) -> CopyResult<String> {
        Err(key_error("null"))
    }

    fn serialize_some<T>(self, value: &T) -> CopyResult<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> CopyResult<String> {
        Err(key_error("null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> CopyResult<String> {
        Err(key_error("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> CopyResult<String> {
        self.engine.check(name)?;
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> CopyResult<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> CopyResult<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_error("enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> CopyResult<Self::SerializeSeq> {
        Err(key_error("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> CopyResult<Self::SerializeTuple> {
        Err(key_error("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> CopyResult<Self::SerializeTupleStruct> {
        Err(key_error("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> CopyResult<Self::SerializeTupleVariant> {
        Err(key_error("enum variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> CopyResult<Self::SerializeMap> {
        Err(key_error("mapping"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> CopyResult<Self::SerializeStruct> {
        Err(key_error("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> CopyResult<Self::SerializeStructVariant> {
        Err(key_error("enum variant"))
    }
}
