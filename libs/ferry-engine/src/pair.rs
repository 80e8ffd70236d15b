use std::fmt;
use std::marker::PhantomData;

use ferry_api::config::{ConfigParam, ConfigValues};
use ferry_api::converter::Converter;
use ferry_api::error::ResultExt;
use ferry_api::external::External;
use ferry_api::schema::Schema;
use ferry_api::{ConvertError, Value};

use crate::{Dispatcher, Options};

/// Converter for reader families whose key and value schemas are known up
/// front.
pub struct PairConverter<K, V> {
    dispatcher: Dispatcher,
    key_schema: Schema,
    value_schema: Schema,
    _external: PhantomData<fn(&K, &V)>,
}

impl<K, V> PairConverter<K, V> {
    pub fn new(key_schema: Schema, value_schema: Schema) -> Self {
        Self::with_options(key_schema, value_schema, Options::default())
    }

    pub fn with_options(key_schema: Schema, value_schema: Schema, options: Options) -> Self {
        tracing::debug!(
            key = %key_schema,
            value = %value_schema,
            union_resolution = %options.union_resolution,
            "pair converter created"
        );
        Self {
            dispatcher: Dispatcher::new(options),
            key_schema,
            value_schema,
            _external: PhantomData,
        }
    }

    /// Same as [`with_options`](Self::with_options) with options read from
    /// `config`.
    pub fn from_config(
        key_schema: Schema,
        value_schema: Schema,
        config: Option<&ConfigValues>,
    ) -> Result<Self, ConvertError> {
        Ok(Self::with_options(key_schema, value_schema, Options::from_config(config)?))
    }

    pub fn config_params() -> &'static [ConfigParam] {
        Options::params()
    }

    pub fn key_schema(&self) -> &Schema {
        &self.key_schema
    }

    pub fn value_schema(&self) -> &Schema {
        &self.value_schema
    }
}

impl<K, V> fmt::Debug for PairConverter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairConverter")
            .field("key_schema", &format_args!("{}", self.key_schema))
            .field("value_schema", &format_args!("{}", self.value_schema))
            .field("options", self.dispatcher.options())
            .finish()
    }
}

impl<K: External, V: External> Converter for PairConverter<K, V> {
    type ExternalKey = K;
    type ExternalValue = V;

    fn convert(&self, key: &K, value: &V) -> Result<(Value, Value), ConvertError> {
        let key = self.dispatcher.convert(key, &self.key_schema).context("key")?;
        let value = self.dispatcher.convert(value, &self.value_schema).context("value")?;
        Ok((key, value))
    }
}
