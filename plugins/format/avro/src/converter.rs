use apache_avro::types;
use ferry_api::config::{ConfigParam, ConfigValues};
use ferry_api::converter::{ConvertBack, Converter, FromConfig};
use ferry_api::error::ResultExt;
use ferry_api::{ConvertError, Schema, Value};
use ferry_engine::{Dispatcher, Options};

use crate::wrapper::Wrapped;
use crate::write::to_avro;

/// Converter for the Avro record-reader family.
///
/// Each side uses the schema embedded in its wrapper, falling back to the
/// schema given at construction.
#[derive(Debug, Clone, Default)]
pub struct AvroWrapperConverter {
    dispatcher: Dispatcher,
    key_schema: Option<Schema>,
    value_schema: Option<Schema>,
}

impl AvroWrapperConverter {
    pub fn new(options: Options) -> Self {
        tracing::debug!(union_resolution = %options.union_resolution, "avro converter created");
        Self {
            dispatcher: Dispatcher::new(options),
            key_schema: None,
            value_schema: None,
        }
    }

    pub fn with_key_schema(mut self, schema: Schema) -> Self {
        self.key_schema = Some(schema);
        self
    }

    pub fn with_value_schema(mut self, schema: Schema) -> Self {
        self.value_schema = Some(schema);
        self
    }

    fn convert_side(
        &self,
        side: &'static str,
        wrapped: &Wrapped,
        fallback: Option<&Schema>,
    ) -> Result<Value, ConvertError> {
        let Some((datum, embedded)) = wrapped.unwrap_datum() else {
            return Ok(Value::Null);
        };
        let schema = embedded
            .or(fallback)
            .ok_or(ConvertError::MissingSchema(side))?;
        self.dispatcher.convert(datum, schema).context(side)
    }
}

impl Converter for AvroWrapperConverter {
    type ExternalKey = Wrapped;
    type ExternalValue = Wrapped;

    fn convert(&self, key: &Wrapped, value: &Wrapped) -> Result<(Value, Value), ConvertError> {
        let key = self.convert_side("key", key, self.key_schema.as_ref())?;
        let value = self.convert_side("value", value, self.value_schema.as_ref())?;
        Ok((key, value))
    }
}

/// Produces the carrier datum for logical types; finish it with
/// [`restore_logical`](crate::restore_logical) before handing it to an
/// encoder.
impl ConvertBack for AvroWrapperConverter {
    type Output = types::Value;

    fn convert_back(&self, value: &Value, schema: &Schema) -> Result<types::Value, ConvertError> {
        to_avro(&self.dispatcher, value, schema)
    }
}

impl FromConfig for AvroWrapperConverter {
    fn config_params() -> &'static [ConfigParam] {
        Options::params()
    }

    fn from_config(config: Option<&ConfigValues>) -> Result<Self, ConvertError> {
        Ok(Self::new(Options::from_config(config)?))
    }
}
