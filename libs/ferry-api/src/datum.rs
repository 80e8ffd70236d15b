use std::borrow::Cow;

use crate::error::ConvertError;
use crate::external::{BufferView, ByName, ByPosition, Describe, External, PrimitiveArray, Shape};

/// Owned byte buffer with a readable window, the way buffer-based
/// deserializers hand out byte fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ByteBuffer {
    backing: Vec<u8>,
    position: usize,
    limit: usize,
}

impl ByteBuffer {
    /// Whole backing storage readable.
    pub fn wrap(backing: Vec<u8>) -> Self {
        let limit = backing.len();
        Self {
            backing,
            position: 0,
            limit,
        }
    }

    /// Readable window `[position, limit)` over `backing`.
    pub fn with_window(backing: Vec<u8>, position: usize, limit: usize) -> Result<Self, ConvertError> {
        BufferView::new(&backing, position, limit)?;
        Ok(Self {
            backing,
            position,
            limit,
        })
    }

    pub fn backing(&self) -> &[u8] {
        &self.backing
    }

    pub fn view(&self) -> BufferView<'_> {
        BufferView::checked(&self.backing, self.position, self.limit)
    }
}

/// Native in-memory object graph.
///
/// Covers every representation style an upstream deserializer may pick for
/// the same logical schema: positional vs by-name records, byte buffers vs
/// flat byte arrays, primitive vs object arrays vs lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Buffer(ByteBuffer),
    ByteArray(Vec<u8>),
    /// Named fixed-size value.
    Fixed { name: Option<String>, bytes: Vec<u8> },
    /// Enum symbol.
    Symbol { name: Option<String>, symbol: String },
    Booleans(Vec<bool>),
    Ints(Vec<i32>),
    Longs(Vec<i64>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
    /// Object-element array.
    Objects(Box<[Datum]>),
    /// Collection-like list.
    List(Vec<Datum>),
    Map(Vec<(Datum, Datum)>),
    /// Positional record; value `i` belongs to declared field `i`.
    Record { name: Option<String>, values: Vec<Datum> },
    /// Record with fields looked up by name.
    Object { name: Option<String>, fields: Vec<(String, Datum)> },
    /// Value tagged with the union branch it was written with.
    Branch(usize, Box<Datum>),
    /// Anything the converter has no representation for.
    Opaque(&'static str),
}

impl Datum {
    pub fn str(s: impl Into<String>) -> Self {
        Datum::Str(s.into())
    }

    pub fn object<K: Into<String>>(
        name: Option<&str>,
        fields: impl IntoIterator<Item = (K, Datum)>,
    ) -> Self {
        Datum::Object {
            name: name.map(str::to_string),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn record(name: Option<&str>, values: Vec<Datum>) -> Self {
        Datum::Record {
            name: name.map(str::to_string),
            values,
        }
    }
}

impl Describe for Datum {
    fn describe(&self) -> Option<Cow<'_, str>> {
        match self {
            Datum::Str(s) => Some(Cow::Borrowed(s.as_str())),
            Datum::Symbol { symbol, .. } => Some(Cow::Borrowed(symbol.as_str())),
            Datum::Boolean(b) => Some(Cow::Owned(b.to_string())),
            Datum::Int(i) => Some(Cow::Owned(i.to_string())),
            Datum::Long(l) => Some(Cow::Owned(l.to_string())),
            Datum::Float(f) => Some(Cow::Owned(f.to_string())),
            Datum::Double(d) => Some(Cow::Owned(d.to_string())),
            Datum::Branch(_, inner) => inner.describe(),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Boolean(_) => "boolean",
            Datum::Int(_) => "int",
            Datum::Long(_) => "long",
            Datum::Float(_) => "float",
            Datum::Double(_) => "double",
            Datum::Str(_) => "str",
            Datum::Buffer(_) => "byte buffer",
            Datum::ByteArray(_) => "byte array",
            Datum::Fixed { .. } => "fixed",
            Datum::Symbol { .. } => "symbol",
            Datum::Booleans(_) => "boolean[]",
            Datum::Ints(_) => "int[]",
            Datum::Longs(_) => "long[]",
            Datum::Floats(_) => "float[]",
            Datum::Doubles(_) => "double[]",
            Datum::Objects(_) => "object[]",
            Datum::List(_) => "list",
            Datum::Map(_) => "map",
            Datum::Record { .. } => "record",
            Datum::Object { .. } => "object",
            Datum::Branch(..) => "branch",
            Datum::Opaque(type_name) => *type_name,
        }
    }
}

impl External for Datum {
    fn shape(&self) -> Shape<'_, Self> {
        match self {
            Datum::Null => Shape::Absent,
            Datum::Boolean(b) => Shape::Bool(*b),
            Datum::Int(i) => Shape::Int32(*i),
            Datum::Long(l) => Shape::Int64(*l),
            Datum::Float(f) => Shape::Float32(*f),
            Datum::Double(d) => Shape::Float64(*d),
            Datum::Buffer(buf) => Shape::Buffer(buf.view()),
            Datum::ByteArray(bytes) | Datum::Fixed { bytes, .. } => {
                Shape::FlatBytes(Cow::Borrowed(bytes.as_slice()))
            }
            Datum::Str(s) => Shape::Text(Cow::Borrowed(s.as_str())),
            Datum::Symbol { symbol, .. } => Shape::Text(Cow::Borrowed(symbol.as_str())),
            Datum::Booleans(v) => Shape::PrimitiveArray(PrimitiveArray::Bool(v.as_slice())),
            Datum::Ints(v) => Shape::PrimitiveArray(PrimitiveArray::Int32(v.as_slice())),
            Datum::Longs(v) => Shape::PrimitiveArray(PrimitiveArray::Int64(v.as_slice())),
            Datum::Floats(v) => Shape::PrimitiveArray(PrimitiveArray::Float32(v.as_slice())),
            Datum::Doubles(v) => Shape::PrimitiveArray(PrimitiveArray::Float64(v.as_slice())),
            Datum::Objects(items) => Shape::ObjectArray(&items[..]),
            Datum::List(items) => Shape::Iterable(Box::new(items.iter())),
            Datum::Map(entries) => Shape::Association(Box::new(
                entries.iter().map(|(k, v)| (k as &dyn Describe, v)),
            )),
            Datum::Record { values, .. } => Shape::Record(Box::new(ByPosition::new(values.as_slice()))),
            Datum::Object { fields, .. } => Shape::Record(Box::new(ByName::new(fields.as_slice()))),
            Datum::Branch(index, inner) => Shape::Branch {
                index: *index,
                value: &**inner,
            },
            Datum::Opaque(_) => Shape::Unrecognized,
        }
    }

    fn declared_name(&self) -> Option<&str> {
        match self {
            Datum::Fixed { name, .. }
            | Datum::Symbol { name, .. }
            | Datum::Record { name, .. }
            | Datum::Object { name, .. } => name.as_deref(),
            Datum::Branch(_, inner) => inner.declared_name(),
            _ => None,
        }
    }
}
