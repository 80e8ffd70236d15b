use ferry_api::error::ResultExt;
use ferry_api::external::{External, PrimitiveArray, Shape};
use ferry_api::schema::Schema;
use ferry_api::{ConvertError, Value};

use crate::Dispatcher;

pub(crate) fn unpack_array<E: External>(
    dispatcher: &Dispatcher,
    value: &E,
    shape: Shape<'_, E>,
    items: &Schema,
) -> Result<Value, ConvertError> {
    match shape {
        // Already final scalars: no element dispatch.
        Shape::PrimitiveArray(array) => Ok(Value::Sequence(copy_primitives(array))),
        Shape::ObjectArray(elements) => convert_elements(dispatcher, elements.iter(), items),
        Shape::Iterable(elements) => convert_elements(dispatcher, elements, items),
        _ => Err(ConvertError::UnrecognizedArrayRepresentation(value.type_name())),
    }
}

fn convert_elements<'a, E: External + 'a>(
    dispatcher: &Dispatcher,
    elements: impl Iterator<Item = &'a E>,
    items: &Schema,
) -> Result<Value, ConvertError> {
    let mut out = Vec::with_capacity(elements.size_hint().0);
    for (i, element) in elements.enumerate() {
        out.push(dispatcher.convert(element, items).context(format_args!("item {i}"))?);
    }
    Ok(Value::Sequence(out))
}

fn copy_primitives(array: PrimitiveArray<'_>) -> Vec<Value> {
    match array {
        PrimitiveArray::Bool(v) => v.iter().copied().map(Value::Bool).collect(),
        PrimitiveArray::Int32(v) => v.iter().copied().map(Value::Int32).collect(),
        PrimitiveArray::Int64(v) => v.iter().copied().map(Value::Int64).collect(),
        PrimitiveArray::Float32(v) => v.iter().copied().map(Value::Float32).collect(),
        PrimitiveArray::Float64(v) => v.iter().copied().map(Value::Float64).collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::cell::Cell;

    use ferry_api::datum::Datum;
    use ferry_api::external::Describe;
    use ferry_api::schema::RecordField;

    use crate::convert;

    use super::*;

    /// Counts classifications, i.e. dispatcher visits.
    struct Counted<'c> {
        visits: &'c Cell<usize>,
        ints: Vec<i32>,
    }

    impl Describe for Counted<'_> {
        fn describe(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn type_name(&self) -> &'static str {
            "counted"
        }
    }

    impl External for Counted<'_> {
        fn shape(&self) -> Shape<'_, Self> {
            self.visits.set(self.visits.get() + 1);
            Shape::PrimitiveArray(PrimitiveArray::Int32(&self.ints))
        }
    }

    #[test]
    fn primitive_elements_skip_the_dispatcher() {
        let visits = Cell::new(0);
        let input = Counted {
            visits: &visits,
            ints: vec![1, 2, 3],
        };
        let out = convert(&input, &Schema::array(Schema::Int32)).unwrap();
        assert_eq!(
            out,
            Value::Sequence(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])
        );
        // One classification for the array itself, none per element.
        assert_eq!(visits.get(), 1);
    }

    #[test]
    fn iterable_of_records_converts_each_in_order() {
        let point = Schema::record(
            "Point",
            vec![
                RecordField::new("x", Schema::Int32),
                RecordField::new("y", Schema::Int32),
            ],
        )
        .unwrap();
        let input = Datum::List(
            (0..3)
                .map(|i| Datum::record(None, vec![Datum::Int(i), Datum::Int(i * 10)]))
                .collect(),
        );

        let Value::Sequence(items) = convert(&input, &Schema::array(point)).unwrap() else {
            panic!("array schema must yield a sequence");
        };
        assert_eq!(items.len(), 3);
        for (i, item) in items.iter().enumerate() {
            let i = i as i32;
            assert_eq!(
                item,
                &Value::Record(vec![
                    ("x".into(), Value::Int32(i)),
                    ("y".into(), Value::Int32(i * 10)),
                ])
            );
        }
    }

    #[test]
    fn object_arrays_recurse_with_element_schema() {
        let input = Datum::Objects(vec![Datum::Int(5), Datum::Null, Datum::Int(6)].into());
        let schema = Schema::array(Schema::union(vec![Schema::Null, Schema::Int64]).unwrap());
        // int → int64 is not a union match, so the element schema really is consulted.
        assert!(convert(&input, &schema).is_err());

        let schema = Schema::array(Schema::union(vec![Schema::Null, Schema::Int32]).unwrap());
        assert_eq!(
            convert(&input, &schema).unwrap(),
            Value::Sequence(vec![Value::Int32(5), Value::Null, Value::Int32(6)])
        );
    }

    #[test]
    fn element_failures_name_the_index() {
        let input = Datum::List(vec![Datum::Int(1), Datum::str("two")]);
        let err = convert(&input, &Schema::array(Schema::Int32)).unwrap_err();
        assert_eq!(err.path(), vec!["item 1"]);
        assert!(matches!(err.root_cause(), ConvertError::UnexpectedShape { .. }));
    }

    #[test]
    fn non_array_shapes_are_rejected() {
        let err = convert(&Datum::str("abc"), &Schema::array(Schema::String)).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedArrayRepresentation("str")));
    }
}
