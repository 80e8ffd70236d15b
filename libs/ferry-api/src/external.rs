//! External representation capabilities.
//!
//! Every producer style (generic Avro datum, native [`Datum`](crate::datum::Datum),
//! canonical [`Value`](crate::value::Value)) classifies itself into one
//! [`Shape`] before conversion. Unpackers only ever look at shapes, never at
//! concrete producer types.

use std::borrow::Cow;

use crate::error::ConvertError;
use crate::schema::{RecordField, RecordSchema};

/// "Describe as text" capability. Also implemented by plain strings so that
/// association keys need not be full external values.
pub trait Describe {
    /// Stable textual form, `None` if the value has none.
    fn describe(&self) -> Option<Cow<'_, str>>;

    /// Runtime shape descriptor used in error messages.
    fn type_name(&self) -> &'static str;
}

impl Describe for str {
    fn describe(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }

    fn type_name(&self) -> &'static str {
        "string"
    }
}

impl Describe for String {
    fn describe(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }

    fn type_name(&self) -> &'static str {
        "string"
    }
}

/// A value materialized by some upstream producer.
pub trait External: Describe + Sized {
    /// Classify the value. Producers must pick the first matching shape in
    /// declaration order of [`Shape`].
    fn shape(&self) -> Shape<'_, Self>;

    /// Declared schema name carried by the value (records, fixed, enums).
    fn declared_name(&self) -> Option<&str> {
        None
    }
}

/// Tagged classification of an external value.
pub enum Shape<'a, E> {
    /// The absence sentinel.
    Absent,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    /// Buffer with a readable window narrower than its backing storage.
    Buffer(BufferView<'a>),
    /// Byte sequence whose whole content is readable.
    FlatBytes(Cow<'a, [u8]>),
    Text(Cow<'a, str>),
    /// Array of elements already in final scalar form.
    PrimitiveArray(PrimitiveArray<'a>),
    /// Indexed array of external values.
    ObjectArray(&'a [E]),
    /// Collection-like iterable of external values.
    Iterable(Box<dyn Iterator<Item = &'a E> + 'a>),
    /// Key/value association.
    Association(Box<dyn Iterator<Item = (&'a dyn Describe, &'a E)> + 'a>),
    Record(Box<dyn RecordAccessor<'a, E> + 'a>),
    /// Value tagged with an explicit union branch index.
    Branch { index: usize, value: &'a E },
    Unrecognized,
}

impl<E> Shape<'_, E> {
    pub fn label(&self) -> &'static str {
        match self {
            Shape::Absent => "absent",
            Shape::Bool(_) => "bool",
            Shape::Int32(_) => "int32",
            Shape::Int64(_) => "int64",
            Shape::Float32(_) => "float32",
            Shape::Float64(_) => "float64",
            Shape::Buffer(_) => "buffer",
            Shape::FlatBytes(_) => "bytes",
            Shape::Text(_) => "text",
            Shape::PrimitiveArray(_) => "primitive array",
            Shape::ObjectArray(_) => "object array",
            Shape::Iterable(_) => "iterable",
            Shape::Association(_) => "association",
            Shape::Record(_) => "record",
            Shape::Branch { .. } => "union branch",
            Shape::Unrecognized => "unrecognized",
        }
    }
}

/// Borrowed window `[position, limit)` over a backing byte storage.
#[derive(Debug, Clone, Copy)]
pub struct BufferView<'a> {
    backing: &'a [u8],
    position: usize,
    limit: usize,
}

impl<'a> BufferView<'a> {
    pub fn new(backing: &'a [u8], position: usize, limit: usize) -> Result<Self, ConvertError> {
        if position > limit || limit > backing.len() {
            return Err(ConvertError::InvalidBufferWindow {
                position,
                limit,
                capacity: backing.len(),
            });
        }
        Ok(Self {
            backing,
            position,
            limit,
        })
    }

    /// Window already validated by the owner of `backing`.
    pub(crate) fn checked(backing: &'a [u8], position: usize, limit: usize) -> Self {
        debug_assert!(position <= limit && limit <= backing.len());
        Self {
            backing,
            position,
            limit,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn capacity(&self) -> usize {
        self.backing.len()
    }

    /// Only the readable window, never the trailing capacity.
    pub fn readable(&self) -> &'a [u8] {
        &self.backing[self.position..self.limit]
    }
}

/// Borrowed array of primitive scalars.
#[derive(Debug, Clone, Copy)]
pub enum PrimitiveArray<'a> {
    Bool(&'a [bool]),
    Int32(&'a [i32]),
    Int64(&'a [i64]),
    Float32(&'a [f32]),
    Float64(&'a [f64]),
}

impl PrimitiveArray<'_> {
    pub fn len(&self) -> usize {
        match self {
            PrimitiveArray::Bool(v) => v.len(),
            PrimitiveArray::Int32(v) => v.len(),
            PrimitiveArray::Int64(v) => v.len(),
            PrimitiveArray::Float32(v) => v.len(),
            PrimitiveArray::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Field access over a record-shaped external value.
///
/// The record unpacker is written once against this trait; producers pick
/// [`ByName`] or [`ByPosition`] depending on how they store fields.
pub trait RecordAccessor<'a, E: 'a> {
    /// Value of `field`, declared at `position` in the record schema.
    fn field_value(&self, field: &RecordField, position: usize) -> Option<&'a E>;

    /// Number of stored values when fields are addressed by position only.
    fn arity(&self) -> Option<usize> {
        None
    }

    /// Whether every declared field of `record` can be supplied.
    ///
    /// Positions carry no names, so a positional accessor supplies a record
    /// only when its arity equals the field count.
    fn supplies(&self, record: &RecordSchema) -> bool {
        match self.arity() {
            Some(arity) => arity == record.fields().len(),
            None => record
                .fields()
                .iter()
                .enumerate()
                .all(|(i, f)| self.field_value(f, i).is_some()),
        }
    }
}

/// Name-based field lookup over `(name, value)` pairs.
pub struct ByName<'a, E> {
    fields: &'a [(String, E)],
}

impl<'a, E> ByName<'a, E> {
    pub fn new(fields: &'a [(String, E)]) -> Self {
        Self { fields }
    }
}

impl<'a, E: 'a> RecordAccessor<'a, E> for ByName<'a, E> {
    fn field_value(&self, field: &RecordField, _position: usize) -> Option<&'a E> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, value)| value)
    }
}

/// Positional field lookup; field `i` of the schema is value `i`.
pub struct ByPosition<'a, E> {
    values: &'a [E],
}

impl<'a, E> ByPosition<'a, E> {
    pub fn new(values: &'a [E]) -> Self {
        Self { values }
    }
}

impl<'a, E: 'a> RecordAccessor<'a, E> for ByPosition<'a, E> {
    fn field_value(&self, _field: &RecordField, position: usize) -> Option<&'a E> {
        self.values.get(position)
    }

    fn arity(&self) -> Option<usize> {
        Some(self.values.len())
    }
}
