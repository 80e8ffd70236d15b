use std::io::Read;

use apache_avro::{Reader, Schema as AvroSchema};
use ferry_api::{ConvertError, Schema};

use crate::schema::translate;
use crate::wrapper::{AvroKey, Wrapped};

/// Record reader over an Avro object container file.
///
/// Yields `(key, value)` pairs the way a key-only Avro input format does:
/// the datum is the key, carrying the file's schema, and the value side is
/// empty.
pub struct AvroRecordReader<R: Read> {
    inner: Reader<'static, R>,
    schema: Schema,
}

impl<R: Read> AvroRecordReader<R> {
    pub fn new(input: R) -> Result<Self, ConvertError> {
        let inner = Reader::new(input).map_err(|e| ConvertError::Format(format!("avro header: {e}")))?;
        let schema = translate(inner.writer_schema())?;
        tracing::debug!(schema = %schema, "avro container opened");
        Ok(Self { inner, schema })
    }

    /// Descriptor translated from the file's writer schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The file's own Avro schema, needed to write logical values back.
    pub fn writer_schema(&self) -> &AvroSchema {
        self.inner.writer_schema()
    }
}

impl<R: Read> Iterator for AvroRecordReader<R> {
    type Item = Result<(Wrapped, Wrapped), ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.next()?;
        Some(
            next.map(|datum| (Wrapped::Key(AvroKey::with_schema(datum, self.schema.clone())), Wrapped::Null))
                .map_err(|e| ConvertError::Format(format!("avro decode: {e}"))),
        )
    }
}
