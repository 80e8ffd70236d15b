use crate::config::{ConfigParam, ConfigValues};
use crate::error::ConvertError;
use crate::schema::Schema;
use crate::value::Value;

/// Key/value converter for one record-reader family.
///
/// Stateless: one instance converts records from any number of partitions
/// concurrently. Each call either returns both canonical values or an error
/// for that record alone, never a partially converted value.
pub trait Converter: Send + Sync {
    /// Key object as produced by the record reader (possibly wrapped).
    type ExternalKey;
    /// Value object as produced by the record reader (possibly wrapped).
    type ExternalValue;

    fn convert(
        &self,
        key: &Self::ExternalKey,
        value: &Self::ExternalValue,
    ) -> Result<(Value, Value), ConvertError>;
}

/// Write direction: canonical value → representation accepted by the
/// record-writer family.
pub trait ConvertBack: Send + Sync {
    type Output;

    fn convert_back(&self, value: &Value, schema: &Schema) -> Result<Self::Output, ConvertError>;
}

/// Construction from optional opaque settings.
pub trait FromConfig: Sized {
    /// Settings this converter understands.
    fn config_params() -> &'static [ConfigParam];

    /// `None` must yield a fully working converter.
    fn from_config(config: Option<&ConfigValues>) -> Result<Self, ConvertError>;
}
