use ferry_api::external::{External, Shape};
use ferry_api::schema::SchemaKind;
use ferry_api::{ConvertError, Value};

/// Null, Boolean and numeric kinds: the value is already in final scalar
/// form. The schema decides the canonical variant; only lossless widening
/// is accepted.
pub(crate) fn unpack_scalar<E: External>(
    value: &E,
    shape: Shape<'_, E>,
    kind: SchemaKind,
) -> Result<Value, ConvertError> {
    Ok(match (kind, shape) {
        (SchemaKind::Boolean, Shape::Bool(b)) => Value::Bool(b),
        (SchemaKind::Int32, Shape::Int32(i)) => Value::Int32(i),
        (SchemaKind::Int64, Shape::Int64(i)) => Value::Int64(i),
        (SchemaKind::Int64, Shape::Int32(i)) => Value::Int64(i64::from(i)),
        (SchemaKind::Float32, Shape::Float32(f)) => Value::Float32(f),
        (SchemaKind::Float64, Shape::Float64(f)) => Value::Float64(f),
        (SchemaKind::Float64, Shape::Float32(f)) => Value::Float64(f64::from(f)),
        (SchemaKind::Float64, Shape::Int32(i)) => Value::Float64(f64::from(i)),
        (kind, _) => {
            return Err(ConvertError::UnexpectedShape {
                kind,
                shape: value.type_name(),
            });
        }
    })
}

/// String and Enum kinds go through the value's textual form; enum
/// ordinals are not kept.
pub(crate) fn unpack_text<E: External>(value: &E) -> Result<Value, ConvertError> {
    value
        .describe()
        .map(|text| Value::Text(text.into_owned()))
        .ok_or_else(|| ConvertError::NotDescribable(value.type_name()))
}

#[cfg(test)]
mod tests {
    use ferry_api::datum::Datum;
    use ferry_api::schema::Schema;

    use crate::convert;

    use super::*;

    #[test]
    fn scalars_pass_through_with_schema_width() {
        assert_eq!(convert(&Datum::Boolean(true), &Schema::Boolean).unwrap(), Value::Bool(true));
        assert_eq!(convert(&Datum::Int(-3), &Schema::Int32).unwrap(), Value::Int32(-3));
        assert_eq!(convert(&Datum::Long(1 << 40), &Schema::Int64).unwrap(), Value::Int64(1 << 40));
        assert_eq!(convert(&Datum::Float(0.5), &Schema::Float32).unwrap(), Value::Float32(0.5));
        assert_eq!(convert(&Datum::Double(0.25), &Schema::Float64).unwrap(), Value::Float64(0.25));
    }

    #[test]
    fn lossless_widening_only() {
        assert_eq!(convert(&Datum::Int(7), &Schema::Int64).unwrap(), Value::Int64(7));
        assert_eq!(convert(&Datum::Float(1.5), &Schema::Float64).unwrap(), Value::Float64(1.5));
        assert_eq!(convert(&Datum::Int(2), &Schema::Float64).unwrap(), Value::Float64(2.0));

        let err = convert(&Datum::Long(7), &Schema::Int32).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnexpectedShape { kind: SchemaKind::Int32, shape: "long" }
        ));
        assert!(convert(&Datum::Double(1.0), &Schema::Float32).is_err());
        assert!(convert(&Datum::str("true"), &Schema::Boolean).is_err());
    }

    #[test]
    fn null_schema_accepts_only_absence() {
        assert_eq!(convert(&Datum::Null, &Schema::Null).unwrap(), Value::Null);
        assert!(matches!(
            convert(&Datum::Int(0), &Schema::Null),
            Err(ConvertError::UnexpectedShape { kind: SchemaKind::Null, .. })
        ));
    }

    #[test]
    fn text_kinds_use_textual_form() {
        let side = Schema::enumeration("Side", ["BUY", "SELL"]).unwrap();
        let symbol = Datum::Symbol { name: Some("Side".into()), symbol: "BUY".into() };
        assert_eq!(convert(&symbol, &side).unwrap(), Value::Text("BUY".into()));
        assert_eq!(convert(&Datum::str("hi"), &Schema::String).unwrap(), Value::Text("hi".into()));
        assert_eq!(convert(&Datum::Long(12), &Schema::String).unwrap(), Value::Text("12".into()));

        let err = convert(&Datum::ByteArray(vec![1]), &Schema::String).unwrap_err();
        assert!(matches!(err, ConvertError::NotDescribable("byte array")));
    }
}
