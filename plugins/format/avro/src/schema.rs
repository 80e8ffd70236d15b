use std::collections::HashMap;

use apache_avro::Schema as AvroSchema;
use apache_avro::schema::Name as AvroName;
use ferry_api::schema::{Name, RecordField, Schema};
use ferry_api::ConvertError;

/// Build the descriptor for a parsed Avro schema.
///
/// Named types referenced again later (`Ref`) resolve to the type built at
/// their first occurrence; a reference to a record that is still being
/// built becomes a back reference.
pub fn translate(schema: &AvroSchema) -> Result<Schema, ConvertError> {
    Translator::default().translate(schema)
}

#[derive(Default)]
struct Translator {
    /// Back references of records under construction, innermost last.
    enclosing: Vec<(String, Schema)>,
    named: HashMap<String, Schema>,
}

impl Translator {
    fn translate(&mut self, schema: &AvroSchema) -> Result<Schema, ConvertError> {
        Ok(match schema {
            AvroSchema::Null => Schema::Null,
            AvroSchema::Boolean => Schema::Boolean,
            AvroSchema::Int | AvroSchema::Date | AvroSchema::TimeMillis => Schema::Int32,
            AvroSchema::Long
            | AvroSchema::TimeMicros
            | AvroSchema::TimestampMillis
            | AvroSchema::TimestampMicros
            | AvroSchema::TimestampNanos
            | AvroSchema::LocalTimestampMillis
            | AvroSchema::LocalTimestampMicros
            | AvroSchema::LocalTimestampNanos => Schema::Int64,
            AvroSchema::Float => Schema::Float32,
            AvroSchema::Double => Schema::Float64,
            AvroSchema::String | AvroSchema::Uuid | AvroSchema::BigDecimal => Schema::String,
            AvroSchema::Bytes => Schema::Bytes,
            AvroSchema::Decimal(decimal) => self.translate(&decimal.inner)?,
            AvroSchema::Fixed(fixed) => {
                let out = Schema::fixed(name_of(&fixed.name), fixed.size);
                self.remember(out)
            }
            AvroSchema::Enum(e) => {
                let out = Schema::enumeration(name_of(&e.name), e.symbols.iter().cloned())?;
                self.remember(out)
            }
            AvroSchema::Array(array) => Schema::array(self.translate(&array.items)?),
            AvroSchema::Map(map) => Schema::map(self.translate(&map.types)?),
            AvroSchema::Union(union) => {
                let branches = union
                    .variants()
                    .iter()
                    .map(|variant| self.translate(variant))
                    .collect::<Result<Vec<_>, _>>()?;
                Schema::union(branches)?
            }
            AvroSchema::Record(record) => {
                let name = name_of(&record.name);
                let fullname = name.fullname();
                let out = Schema::recursive_record(name, |this| {
                    self.enclosing.push((fullname, this.clone()));
                    let fields = record
                        .fields
                        .iter()
                        .map(|field| {
                            let schema = self.translate(&field.schema).map_err(|e| {
                                e.with_context(format_args!("field '{}'", field.name))
                            })?;
                            Ok(RecordField::new(field.name.clone(), schema))
                        })
                        .collect::<Result<Vec<_>, ConvertError>>();
                    self.enclosing.pop();
                    fields
                })?;
                self.remember(out)
            }
            AvroSchema::Ref { name } => self.resolve(&name_of(name).fullname())?,
            AvroSchema::Duration => {
                return Err(ConvertError::UnknownSchemaKind("avro duration".into()));
            }
        })
    }

    fn resolve(&self, fullname: &str) -> Result<Schema, ConvertError> {
        self.enclosing
            .iter()
            .rev()
            .find(|(name, _)| name == fullname)
            .map(|(_, back)| back)
            .or_else(|| self.named.get(fullname))
            .cloned()
            .ok_or_else(|| ConvertError::UnknownSchemaKind(format!("unresolved reference to {fullname}")))
    }

    fn remember(&mut self, schema: Schema) -> Schema {
        if let Some(name) = schema.name() {
            self.named.insert(name.fullname(), schema.clone());
        }
        schema
    }
}

fn name_of(name: &AvroName) -> Name {
    Name::with_namespace(name.name.clone(), name.namespace.clone())
}
