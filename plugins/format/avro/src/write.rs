use std::collections::HashMap;

use apache_avro::types;
use ferry_api::error::ResultExt;
use ferry_api::schema::{RecordSchema, Schema, SchemaKind};
use ferry_api::{ConvertError, Value};
use ferry_engine::Dispatcher;

/// Canonical value → generic Avro datum shaped by `schema`.
///
/// The inverse of the read direction: union branches are picked with the
/// dispatcher's resolution policy, applied to the canonical value itself.
pub fn to_avro(dispatcher: &Dispatcher, value: &Value, schema: &Schema) -> Result<types::Value, ConvertError> {
    Ok(match (schema, value) {
        (Schema::Union(union), _) => {
            let index = dispatcher.resolve_branch(value, union)?;
            let inner = to_avro(dispatcher, value, &union.branches()[index])
                .context(format_args!("branch {index}"))?;
            types::Value::Union(index as u32, Box::new(inner))
        }
        (_, Value::Null) => types::Value::Null,

        (Schema::Boolean, Value::Bool(b)) => types::Value::Boolean(*b),
        (Schema::Int32, Value::Int32(i)) => types::Value::Int(*i),
        (Schema::Int64, Value::Int64(i)) => types::Value::Long(*i),
        (Schema::Int64, Value::Int32(i)) => types::Value::Long(i64::from(*i)),
        (Schema::Float32, Value::Float32(f)) => types::Value::Float(*f),
        (Schema::Float64, Value::Float64(f)) => types::Value::Double(*f),
        (Schema::Float64, Value::Float32(f)) => types::Value::Double(f64::from(*f)),
        (Schema::Float64, Value::Int32(i)) => types::Value::Double(f64::from(*i)),

        (Schema::String, Value::Text(s)) => types::Value::String(s.clone()),
        (Schema::Enum(e), Value::Text(symbol)) => {
            let index = e.symbol_index(symbol).ok_or_else(|| ConvertError::UnknownEnumSymbol {
                name: e.name().fullname(),
                symbol: symbol.clone(),
            })?;
            types::Value::Enum(index as u32, symbol.clone())
        }
        (Schema::Bytes, Value::Bytes(bytes)) => types::Value::Bytes(bytes.clone()),
        (Schema::Fixed(fixed), Value::Bytes(bytes)) => {
            if bytes.len() != fixed.size() {
                return Err(ConvertError::FixedLengthMismatch {
                    expected: fixed.size(),
                    actual: bytes.len(),
                });
            }
            types::Value::Fixed(fixed.size(), bytes.clone())
        }

        (Schema::Array(items), Value::Sequence(elements)) => types::Value::Array(
            elements
                .iter()
                .enumerate()
                .map(|(i, element)| to_avro(dispatcher, element, items).context(format_args!("item {i}")))
                .collect::<Result<_, _>>()?,
        ),
        (Schema::Map(values), Value::Mapping(entries)) => {
            let mut out = HashMap::with_capacity(entries.len());
            for (key, entry) in entries {
                let converted = to_avro(dispatcher, entry, values).context(format_args!("key '{key}'"))?;
                out.insert(key.clone(), converted);
            }
            types::Value::Map(out)
        }
        (Schema::Record(record), Value::Record(_) | Value::Mapping(_)) => {
            record_to_avro(dispatcher, value, record)?
        }
        (Schema::RecordRef(back), _) => {
            let record = back.resolve().ok_or_else(|| {
                ConvertError::UnknownSchemaKind(format!("dangling reference to record {}", back.name()))
            })?;
            if !matches!(value, Value::Record(_) | Value::Mapping(_)) {
                return Err(ConvertError::UnexpectedShape {
                    kind: SchemaKind::Record,
                    shape: value.type_name(),
                });
            }
            record_to_avro(dispatcher, value, &record)?
        }

        (schema, value) => {
            let kind = schema
                .kind()
                .ok_or_else(|| ConvertError::UnknownSchemaKind(schema.to_string()))?;
            return Err(ConvertError::UnexpectedShape {
                kind,
                shape: value.type_name(),
            });
        }
    })
}

fn record_to_avro(
    dispatcher: &Dispatcher,
    value: &Value,
    record: &RecordSchema,
) -> Result<types::Value, ConvertError> {
    let mut fields = Vec::with_capacity(record.fields().len());
    for field in record.fields() {
        let raw = value
            .get(&field.name)
            .ok_or_else(|| ConvertError::MissingField(field.name.clone()))?;
        let converted = to_avro(dispatcher, raw, &field.schema)
            .context(format_args!("field '{}'", field.name))?;
        fields.push((field.name.clone(), converted));
    }
    Ok(types::Value::Record(fields))
}

#[cfg(test)]
mod tests {
    use ferry_api::schema::RecordField;

    use super::*;

    fn write(value: &Value, schema: &Schema) -> Result<types::Value, ConvertError> {
        to_avro(&Dispatcher::default(), value, schema)
    }

    #[test]
    fn scalars_widen_like_the_read_direction() {
        assert_eq!(write(&Value::Int32(3), &Schema::Int64).unwrap(), types::Value::Long(3));
        assert_eq!(write(&Value::Float32(0.5), &Schema::Float64).unwrap(), types::Value::Double(0.5));
        assert!(matches!(
            write(&Value::Int64(3), &Schema::Int32),
            Err(ConvertError::UnexpectedShape { kind: SchemaKind::Int32, .. })
        ));
    }

    #[test]
    fn enums_need_a_declared_symbol() {
        let side = Schema::enumeration("Side", ["BUY", "SELL"]).unwrap();
        assert_eq!(
            write(&Value::Text("SELL".into()), &side).unwrap(),
            types::Value::Enum(1, "SELL".into())
        );
        let err = write(&Value::Text("HOLD".into()), &side).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownEnumSymbol { symbol, .. } if symbol == "HOLD"));
    }

    #[test]
    fn fixed_length_is_checked() {
        let md5 = Schema::fixed("Md5", 2);
        assert_eq!(write(&Value::Bytes(vec![1, 2]), &md5).unwrap(), types::Value::Fixed(2, vec![1, 2]));
        assert!(matches!(
            write(&Value::Bytes(vec![1]), &md5),
            Err(ConvertError::FixedLengthMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn records_accept_mappings_in_any_order() {
        let schema = Schema::record(
            "Pair",
            vec![
                RecordField::new("b", Schema::String),
                RecordField::new("a", Schema::Int32),
            ],
        )
        .unwrap();
        let value = Value::mapping([("a", Value::Int32(1)), ("b", Value::Text("x".into()))]);
        assert_eq!(
            write(&value, &schema).unwrap(),
            types::Value::Record(vec![
                ("b".into(), types::Value::String("x".into())),
                ("a".into(), types::Value::Int(1)),
            ])
        );

        let partial = Value::mapping([("b", Value::Text("x".into()))]);
        assert!(matches!(write(&partial, &schema), Err(ConvertError::MissingField(f)) if f == "a"));
    }

    #[test]
    fn dangling_back_reference_is_unknown_kind() {
        let node = Schema::recursive_record("Node", |this| {
            Ok(vec![RecordField::new("next", this.clone())])
        })
        .unwrap();
        let back = node.as_record().unwrap().fields()[0].schema.clone();
        drop(node);

        let err = write(&Value::Int32(1), &back).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownSchemaKind(msg) if msg.contains("Node")));
        let err = write(&Value::Record(vec![]), &back).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownSchemaKind(_)));
    }

    #[test]
    fn unions_emit_the_selected_index() {
        let schema = Schema::union(vec![Schema::Null, Schema::String, Schema::Int64]).unwrap();
        assert_eq!(
            write(&Value::Null, &schema).unwrap(),
            types::Value::Union(0, Box::new(types::Value::Null))
        );
        assert_eq!(
            write(&Value::Int64(9), &schema).unwrap(),
            types::Value::Union(2, Box::new(types::Value::Long(9)))
        );
        assert!(matches!(
            write(&Value::Bool(true), &schema),
            Err(ConvertError::NoMatchingUnionBranch { .. })
        ));
    }
}
