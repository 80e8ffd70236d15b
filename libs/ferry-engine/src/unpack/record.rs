use ferry_api::error::ResultExt;
use ferry_api::external::{External, Shape};
use ferry_api::schema::RecordSchema;
use ferry_api::{ConvertError, Value};

use crate::Dispatcher;

/// Fields come out in declared schema order, whatever order the accessor
/// stores them in.
pub(crate) fn unpack_record<E: External>(
    dispatcher: &Dispatcher,
    value: &E,
    shape: Shape<'_, E>,
    record: &RecordSchema,
) -> Result<Value, ConvertError> {
    let Shape::Record(accessor) = shape else {
        return Err(ConvertError::UnrecognizedRecordRepresentation(value.type_name()));
    };

    let expected = record.fields().len();
    if let Some(actual) = accessor.arity() {
        if actual != expected {
            return Err(ConvertError::RecordArityMismatch { expected, actual });
        }
    }

    let mut out = Vec::with_capacity(expected);
    for (position, field) in record.fields().iter().enumerate() {
        let raw = accessor
            .field_value(field, position)
            .ok_or_else(|| ConvertError::MissingField(field.name.clone()))?;
        let converted = dispatcher
            .convert(raw, &field.schema)
            .context(format_args!("field '{}'", field.name))?;
        out.push((field.name.clone(), converted));
    }
    Ok(Value::Record(out))
}

#[cfg(test)]
mod tests {
    use ferry_api::datum::Datum;
    use ferry_api::schema::{RecordField, Schema};

    use crate::convert;

    use super::*;

    fn pair() -> Schema {
        Schema::record(
            "Pair",
            vec![
                RecordField::new("b", Schema::String),
                RecordField::new("a", Schema::Int64),
            ],
        )
        .unwrap()
    }

    #[test]
    fn output_follows_schema_order() {
        let input = Datum::object(Some("Pair"), [("a", Datum::Long(1)), ("b", Datum::str("x"))]);
        assert_eq!(
            convert(&input, &pair()).unwrap(),
            Value::Record(vec![
                ("b".into(), Value::Text("x".into())),
                ("a".into(), Value::Int64(1)),
            ])
        );
    }

    #[test]
    fn positional_records_map_by_index() {
        let input = Datum::record(None, vec![Datum::str("x"), Datum::Int(1)]);
        assert_eq!(
            convert(&input, &pair()).unwrap(),
            Value::Record(vec![
                ("b".into(), Value::Text("x".into())),
                ("a".into(), Value::Int64(1)),
            ])
        );
    }

    #[test]
    fn positional_records_need_exact_arity() {
        let extra = Datum::record(None, vec![Datum::str("x"), Datum::Int(1), Datum::Int(2)]);
        assert!(matches!(
            convert(&extra, &pair()),
            Err(ConvertError::RecordArityMismatch { expected: 2, actual: 3 })
        ));
        let short = Datum::record(None, vec![Datum::str("x")]);
        assert!(matches!(
            convert(&short, &pair()),
            Err(ConvertError::RecordArityMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn missing_field_is_named() {
        let input = Datum::object(None, [("b", Datum::str("x"))]);
        let err = convert(&input, &pair()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField(name) if name == "a"));
    }

    #[test]
    fn nested_failures_carry_the_field_path() {
        let outer = Schema::record("Outer", vec![RecordField::new("inner", pair())]).unwrap();
        let input = Datum::object(
            None,
            [("inner", Datum::object(None, [("b", Datum::str("x")), ("a", Datum::str("y"))]))],
        );
        let err = convert(&input, &outer).unwrap_err();
        assert_eq!(err.path(), vec!["field 'inner'", "field 'a'"]);
        assert!(matches!(err.root_cause(), ConvertError::UnexpectedShape { .. }));
    }

    #[test]
    fn non_record_shapes_are_rejected() {
        let err = convert(&Datum::Ints(vec![1, 2]), &pair()).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedRecordRepresentation("int[]")));
    }
}
