use std::borrow::Cow;
use std::collections::HashMap;

use serde::ser::{SerializeMap, SerializeSeq};

use crate::external::{ByName, Describe, External, Shape};

/// Canonical value representation.
///
/// Fully owned: nothing borrows from the external input it was converted
/// from. The shape always follows the schema kind that produced it:
/// - Array → `Sequence`
/// - Map → `Mapping` (text keys, unique, input order)
/// - Record → `Record` (schema field order)
/// - String, Enum → `Text`; Bytes, Fixed → `Bytes`
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Sequence(Vec<Value>),
    Mapping(Vec<(String, Value)>),
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Build a mapping from ordered entries, last write wins on duplicate keys.
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
        let mut out = MappingBuilder::default();
        for (key, value) in entries {
            out.insert(key.into(), value);
        }
        out.finish()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Record(_) => "record",
        }
    }

    /// Entry of a `Mapping` or field of a `Record`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(entries) | Value::Record(entries) => {
                entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Ordered mapping under construction.
///
/// Entries keep insertion order; a duplicate key keeps its first position
/// and takes the new value. Lookups go through a key index so building a
/// mapping stays linear in its size.
#[derive(Debug, Default)]
pub struct MappingBuilder {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl MappingBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the replaced value when `key` was already present.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        if let Some(&position) = self.index.get(&key) {
            tracing::warn!(key = %key, "duplicate mapping key, keeping last value");
            return Some(std::mem::replace(&mut self.entries[position].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Value {
        Value::Mapping(self.entries)
    }
}

// ---------------------------------------------------------------------------
// Hand-off to generic object serializers
// ---------------------------------------------------------------------------

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int32(i) => serializer.serialize_i32(*i),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::Float32(f) => serializer.serialize_f32(*f),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Mapping(entries) | Value::Record(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical values as their own external representation
// ---------------------------------------------------------------------------

impl Describe for Value {
    fn describe(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Int32(i) => Some(Cow::Owned(i.to_string())),
            Value::Int64(i) => Some(Cow::Owned(i.to_string())),
            Value::Float32(f) => Some(Cow::Owned(f.to_string())),
            Value::Float64(f) => Some(Cow::Owned(f.to_string())),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        Value::type_name(self)
    }
}

impl External for Value {
    fn shape(&self) -> Shape<'_, Self> {
        match self {
            Value::Null => Shape::Absent,
            Value::Bool(b) => Shape::Bool(*b),
            Value::Int32(i) => Shape::Int32(*i),
            Value::Int64(i) => Shape::Int64(*i),
            Value::Float32(f) => Shape::Float32(*f),
            Value::Float64(f) => Shape::Float64(*f),
            Value::Bytes(b) => Shape::FlatBytes(Cow::Borrowed(b.as_slice())),
            Value::Text(s) => Shape::Text(Cow::Borrowed(s.as_str())),
            Value::Sequence(items) => Shape::ObjectArray(items.as_slice()),
            Value::Mapping(entries) => Shape::Association(Box::new(
                entries.iter().map(|(k, v)| (k as &dyn Describe, v)),
            )),
            Value::Record(fields) => Shape::Record(Box::new(ByName::new(fields.as_slice()))),
        }
    }
}
