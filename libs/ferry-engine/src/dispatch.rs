use ferry_api::external::{External, Shape};
use ferry_api::schema::{Schema, SchemaKind, UnionSchema};
use ferry_api::{ConvertError, Value};

use crate::options::Options;
use crate::unpack::{array, bytes, map, record, scalar, union};

/// Schema type dispatcher, the entry point of every conversion.
///
/// Stateless and `Copy`: share it freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    options: Options,
}

impl Dispatcher {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Convert `value` into a canonical value shaped by `schema`.
    ///
    /// Absence converts to `Null` under every schema. A value tagged with a
    /// union branch is unwrapped when the schema is not a union.
    pub fn convert<E: External>(&self, value: &E, schema: &Schema) -> Result<Value, ConvertError> {
        let shape = match value.shape() {
            Shape::Absent => return Ok(Value::Null),
            Shape::Branch { value: inner, .. } if !matches!(schema, Schema::Union(_)) => {
                return self.convert(inner, schema);
            }
            shape => shape,
        };

        tracing::trace!(schema = %schema, shape = shape.label(), "dispatch");

        match schema {
            Schema::Null => scalar::unpack_scalar(value, shape, SchemaKind::Null),
            Schema::Boolean => scalar::unpack_scalar(value, shape, SchemaKind::Boolean),
            Schema::Int32 => scalar::unpack_scalar(value, shape, SchemaKind::Int32),
            Schema::Int64 => scalar::unpack_scalar(value, shape, SchemaKind::Int64),
            Schema::Float32 => scalar::unpack_scalar(value, shape, SchemaKind::Float32),
            Schema::Float64 => scalar::unpack_scalar(value, shape, SchemaKind::Float64),
            Schema::String | Schema::Enum(_) => scalar::unpack_text(value),
            Schema::Bytes => bytes::unpack_bytes(value, shape),
            Schema::Fixed(fixed) => bytes::unpack_fixed(value, shape, fixed),
            Schema::Array(items) => array::unpack_array(self, value, shape, items),
            Schema::Map(values) => map::unpack_map(self, value, shape, values),
            Schema::Record(rec) => record::unpack_record(self, value, shape, rec),
            Schema::RecordRef(back) => {
                let rec = back.resolve().ok_or_else(|| {
                    ConvertError::UnknownSchemaKind(format!(
                        "dangling reference to record {}",
                        back.name()
                    ))
                })?;
                record::unpack_record(self, value, shape, &rec)
            }
            Schema::Union(branches) => union::unpack_union(self, value, shape, branches),
        }
    }

    /// Index of the branch of `union` that `value` converts through.
    ///
    /// Shared by the read direction and by writers that must pick a branch
    /// for a canonical value.
    pub fn resolve_branch<E: External>(
        &self,
        value: &E,
        union: &UnionSchema,
    ) -> Result<usize, ConvertError> {
        union::resolve(&self.options, value, &value.shape(), union)
    }
}

/// Convert with default options.
pub fn convert<E: External>(value: &E, schema: &Schema) -> Result<Value, ConvertError> {
    Dispatcher::default().convert(value, schema)
}
