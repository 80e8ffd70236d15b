use apache_avro::types;
use ferry_api::Schema;

/// Key side of an Avro record, optionally carrying its own schema.
#[derive(Debug, Clone)]
pub struct AvroKey {
    datum: types::Value,
    schema: Option<Schema>,
}

/// Value side of an Avro record, optionally carrying its own schema.
#[derive(Debug, Clone)]
pub struct AvroValue {
    datum: types::Value,
    schema: Option<Schema>,
}

macro_rules! wrapper_impl {
    ($ty:ident) => {
        impl $ty {
            pub fn new(datum: types::Value) -> Self {
                Self { datum, schema: None }
            }

            pub fn with_schema(datum: types::Value, schema: Schema) -> Self {
                Self {
                    datum,
                    schema: Some(schema),
                }
            }

            pub fn datum(&self) -> &types::Value {
                &self.datum
            }

            pub fn schema(&self) -> Option<&Schema> {
                self.schema.as_ref()
            }

            pub fn into_datum(self) -> types::Value {
                self.datum
            }
        }
    };
}

wrapper_impl!(AvroKey);
wrapper_impl!(AvroValue);

/// Anything an Avro record reader hands out for one side of a record.
#[derive(Debug, Clone)]
pub enum Wrapped {
    /// No object on this side.
    Null,
    Key(AvroKey),
    Value(AvroValue),
    /// Bare datum without a wrapper.
    Datum(types::Value),
}

impl Wrapped {
    /// The datum and its embedded schema; `None` for [`Wrapped::Null`].
    pub fn unwrap_datum(&self) -> Option<(&types::Value, Option<&Schema>)> {
        match self {
            Wrapped::Null => None,
            Wrapped::Key(key) => Some((key.datum(), key.schema())),
            Wrapped::Value(value) => Some((value.datum(), value.schema())),
            Wrapped::Datum(datum) => Some((datum, None)),
        }
    }
}

impl From<AvroKey> for Wrapped {
    fn from(key: AvroKey) -> Self {
        Wrapped::Key(key)
    }
}

impl From<AvroValue> for Wrapped {
    fn from(value: AvroValue) -> Self {
        Wrapped::Value(value)
    }
}

impl From<types::Value> for Wrapped {
    fn from(datum: types::Value) -> Self {
        Wrapped::Datum(datum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_exposes_embedded_schema() {
        let key: Wrapped = AvroKey::with_schema(types::Value::Long(1), Schema::Int64).into();
        let (datum, schema) = key.unwrap_datum().unwrap();
        assert_eq!(datum, &types::Value::Long(1));
        assert!(matches!(schema, Some(Schema::Int64)));

        let bare: Wrapped = types::Value::String("x".into()).into();
        assert!(matches!(bare.unwrap_datum(), Some((_, None))));
        assert!(Wrapped::Null.unwrap_datum().is_none());
        assert!(AvroValue::new(types::Value::Null).schema().is_none());
    }
}
