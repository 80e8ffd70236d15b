use std::collections::HashMap;

use apache_avro::schema::{Name as AvroName, ResolvedSchema};
use apache_avro::{BigDecimal, Decimal, Schema as AvroSchema, types};
use ferry_api::ConvertError;

/// Restores Avro logical values the descriptor only knows by their carrier.
///
/// The descriptor maps `decimal` to bytes/fixed and `big-decimal` to a
/// string, so [`to_avro`](crate::to_avro) emits the carrier. The encoder
/// wants the logical variant back, which this pass rebuilds by walking the
/// Avro schema next to the datum.
#[derive(Debug, Clone)]
pub struct LogicalTypes {
    named: HashMap<AvroName, AvroSchema>,
}

impl LogicalTypes {
    pub fn new(schema: &AvroSchema) -> Result<Self, ConvertError> {
        let resolved = ResolvedSchema::try_from(schema)
            .map_err(|e| ConvertError::InvalidSchema(format!("avro: {e}")))?;
        let named = resolved
            .get_names()
            .iter()
            .map(|(name, schema)| (name.clone(), (*schema).clone()))
            .collect();
        Ok(Self { named })
    }

    pub fn restore(&self, datum: types::Value, schema: &AvroSchema) -> Result<types::Value, ConvertError> {
        Ok(match (schema, datum) {
            (AvroSchema::Decimal(_), types::Value::Bytes(bytes) | types::Value::Fixed(_, bytes)) => {
                types::Value::Decimal(Decimal::from(bytes))
            }
            (AvroSchema::BigDecimal, types::Value::String(text)) => {
                let parsed = text
                    .parse::<BigDecimal>()
                    .map_err(|e| ConvertError::Format(format!("avro big-decimal '{text}': {e}")))?;
                types::Value::BigDecimal(parsed)
            }
            (AvroSchema::Union(union), types::Value::Union(index, inner)) => {
                let variant = union.variants().get(index as usize).ok_or_else(|| {
                    ConvertError::Format(format!("avro union index {index} out of range"))
                })?;
                types::Value::Union(index, Box::new(self.restore(*inner, variant)?))
            }
            (AvroSchema::Array(array), types::Value::Array(items)) => types::Value::Array(
                items
                    .into_iter()
                    .map(|item| self.restore(item, &array.items))
                    .collect::<Result<_, _>>()?,
            ),
            (AvroSchema::Map(map), types::Value::Map(entries)) => types::Value::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| Ok((key, self.restore(item, &map.types)?)))
                    .collect::<Result<_, ConvertError>>()?,
            ),
            // Fields come out of `to_avro` in schema order.
            (AvroSchema::Record(record), types::Value::Record(fields)) => types::Value::Record(
                fields
                    .into_iter()
                    .zip(&record.fields)
                    .map(|((name, item), field)| Ok((name, self.restore(item, &field.schema)?)))
                    .collect::<Result<_, ConvertError>>()?,
            ),
            (AvroSchema::Ref { name }, datum) => {
                let target = self.named.get(name).ok_or_else(|| {
                    ConvertError::UnknownSchemaKind(format!("unresolved reference to {}", name.fullname(None)))
                })?;
                self.restore(datum, target)?
            }
            (_, datum) => datum,
        })
    }
}

/// One-off [`LogicalTypes::restore`] for callers without a cached table.
pub fn restore_logical(datum: types::Value, schema: &AvroSchema) -> Result<types::Value, ConvertError> {
    LogicalTypes::new(schema)?.restore(datum, schema)
}
