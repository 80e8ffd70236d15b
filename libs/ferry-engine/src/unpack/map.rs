use ferry_api::error::ResultExt;
use ferry_api::external::{External, Shape};
use ferry_api::schema::Schema;
use ferry_api::value::MappingBuilder;
use ferry_api::{ConvertError, Value};

use crate::Dispatcher;

/// Keys through their textual form, values through the declared value
/// schema. Input iteration order is kept; a repeated key keeps its first
/// position and its last value.
pub(crate) fn unpack_map<E: External>(
    dispatcher: &Dispatcher,
    value: &E,
    shape: Shape<'_, E>,
    values: &Schema,
) -> Result<Value, ConvertError> {
    let Shape::Association(entries) = shape else {
        return Err(ConvertError::UnrecognizedMapRepresentation(value.type_name()));
    };

    let mut out = MappingBuilder::with_capacity(entries.size_hint().0);
    for (key, item) in entries {
        let key = key
            .describe()
            .ok_or_else(|| ConvertError::UnrecognizedMapKey(key.type_name()))?
            .into_owned();
        let converted = dispatcher
            .convert(item, values)
            .context(format_args!("key '{key}'"))?;
        out.insert(key, converted);
    }
    Ok(out.finish())
}

#[cfg(test)]
mod tests {
    use ferry_api::datum::{ByteBuffer, Datum};

    use crate::convert;

    use super::*;

    #[test]
    fn keeps_input_order() {
        let input = Datum::Map(vec![
            (Datum::str("a"), Datum::Int(1)),
            (Datum::str("b"), Datum::Int(2)),
        ]);
        assert_eq!(
            convert(&input, &Schema::map(Schema::Int32)).unwrap(),
            Value::Mapping(vec![
                ("a".into(), Value::Int32(1)),
                ("b".into(), Value::Int32(2)),
            ])
        );
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let input = Datum::Map(vec![
            (Datum::str("k"), Datum::Int(1)),
            (Datum::str("z"), Datum::Int(2)),
            (Datum::str("k"), Datum::Int(3)),
        ]);
        assert_eq!(
            convert(&input, &Schema::map(Schema::Int32)).unwrap(),
            Value::Mapping(vec![
                ("k".into(), Value::Int32(3)),
                ("z".into(), Value::Int32(2)),
            ])
        );
    }

    #[test]
    fn wide_maps_keep_order_and_replace_duplicates() {
        let n = 20_000;
        let input = Datum::Map(
            (0..n)
                .chain(0..n)
                .map(|i| (Datum::Str(format!("k{i}")), Datum::Int(i as i32)))
                .collect(),
        );
        let Value::Mapping(entries) = convert(&input, &Schema::map(Schema::Int32)).unwrap() else {
            panic!("map schema must yield a mapping");
        };
        assert_eq!(entries.len(), n);
        assert!(entries.iter().enumerate().all(|(i, (k, _))| *k == format!("k{i}")));
    }

    #[test]
    fn non_textual_key_is_rejected() {
        let input = Datum::Map(vec![(
            Datum::Buffer(ByteBuffer::wrap(vec![1, 2])),
            Datum::Int(1),
        )]);
        let err = convert(&input, &Schema::map(Schema::Int32)).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedMapKey("byte buffer")));
    }

    #[test]
    fn value_failures_name_the_key() {
        let input = Datum::Map(vec![(Datum::str("px"), Datum::str("oops"))]);
        let err = convert(&input, &Schema::map(Schema::Float64)).unwrap_err();
        assert_eq!(err.path(), vec!["key 'px'"]);
    }

    #[test]
    fn non_association_shapes_are_rejected() {
        let input = Datum::List(vec![]);
        let err = convert(&input, &Schema::map(Schema::Int32)).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedMapRepresentation("list")));
    }
}
