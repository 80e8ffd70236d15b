use apache_avro::Schema as AvroSchema;
use ferry_api::{ConvertError, Schema, Value};
use ferry_engine::{Dispatcher, Options};

use crate::logical::LogicalTypes;
use crate::schema::translate;
use crate::write::to_avro;

/// Single-datum Avro encoding bound to one writer schema.
///
/// `decode` reads the binary datum encoding (no container header) straight
/// into a canonical value; `encode` is its inverse.
#[derive(Debug)]
pub struct AvroDatumCodec {
    avro: AvroSchema,
    schema: Schema,
    logical: LogicalTypes,
    dispatcher: Dispatcher,
}

impl AvroDatumCodec {
    pub fn new(avro: AvroSchema, options: Options) -> Result<Self, ConvertError> {
        let schema = translate(&avro)?;
        let logical = LogicalTypes::new(&avro)?;
        Ok(Self {
            avro,
            schema,
            logical,
            dispatcher: Dispatcher::new(options),
        })
    }

    /// Parse an `.avsc` document.
    pub fn parse(raw: &str, options: Options) -> Result<Self, ConvertError> {
        let avro = AvroSchema::parse_str(raw)
            .map_err(|e| ConvertError::InvalidSchema(format!("avro: failed to parse schema: {e}")))?;
        Self::new(avro, options)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn decode(&self, data: &[u8]) -> Result<Value, ConvertError> {
        let mut reader = data;
        let datum = apache_avro::from_avro_datum(&self.avro, &mut reader, None)
            .map_err(|e| ConvertError::Format(format!("avro decode: {e}")))?;
        self.dispatcher.convert(&datum, &self.schema)
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, ConvertError> {
        let datum = to_avro(&self.dispatcher, value, &self.schema)?;
        let datum = self.logical.restore(datum, &self.avro)?;
        apache_avro::to_avro_datum(&self.avro, datum)
            .map_err(|e| ConvertError::Format(format!("avro encode: {e}")))
    }
}
