use ferry_api::external::{External, Shape};
use ferry_api::schema::FixedSchema;
use ferry_api::{ConvertError, Value};

/// Readable bytes of a byte-shaped value: the buffer window, or the whole
/// flat sequence.
pub(crate) fn readable<'s, E>(shape: &'s Shape<'_, E>) -> Option<&'s [u8]> {
    match shape {
        Shape::Buffer(view) => Some(view.readable()),
        Shape::FlatBytes(bytes) => Some(&**bytes),
        _ => None,
    }
}

/// Always copies into a fresh allocation, never the trailing capacity of a
/// buffer.
pub(crate) fn unpack_bytes<E: External>(value: &E, shape: Shape<'_, E>) -> Result<Value, ConvertError> {
    let bytes = readable(&shape)
        .ok_or_else(|| ConvertError::UnrecognizedBytesRepresentation(value.type_name()))?;
    Ok(Value::Bytes(bytes.to_vec()))
}

pub(crate) fn unpack_fixed<E: External>(
    value: &E,
    shape: Shape<'_, E>,
    fixed: &FixedSchema,
) -> Result<Value, ConvertError> {
    let bytes = readable(&shape)
        .ok_or_else(|| ConvertError::UnrecognizedBytesRepresentation(value.type_name()))?;
    if bytes.len() != fixed.size() {
        return Err(ConvertError::FixedLengthMismatch {
            expected: fixed.size(),
            actual: bytes.len(),
        });
    }
    Ok(Value::Bytes(bytes.to_vec()))
}

#[cfg(test)]
mod tests {
    use ferry_api::datum::{ByteBuffer, Datum};
    use ferry_api::schema::Schema;

    use crate::convert;

    use super::*;

    #[test]
    fn buffer_copies_only_the_readable_window() {
        let backing: Vec<u8> = (10..20).collect();
        let buffer = Datum::Buffer(ByteBuffer::with_window(backing, 2, 5).unwrap());

        let Value::Bytes(out) = convert(&buffer, &Schema::Bytes).unwrap() else {
            panic!("bytes schema must yield bytes");
        };
        assert_eq!(out, vec![12, 13, 14]);

        let Datum::Buffer(inner) = &buffer else { unreachable!() };
        let backing_range = inner.backing().as_ptr_range();
        assert!(!backing_range.contains(&out.as_ptr()));
    }

    #[test]
    fn flat_bytes_are_copied_whole() {
        let input = Datum::ByteArray(vec![1, 2, 3, 4]);
        let Value::Bytes(out) = convert(&input, &Schema::Bytes).unwrap() else {
            panic!("bytes schema must yield bytes");
        };
        let Datum::ByteArray(source) = &input else { unreachable!() };
        assert_eq!(&out, source);
        assert_ne!(out.as_ptr(), source.as_ptr());
    }

    #[test]
    fn other_shapes_are_rejected() {
        let err = convert(&Datum::str("abc"), &Schema::Bytes).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedBytesRepresentation("str")));
        let err = convert(&Datum::Ints(vec![1]), &Schema::fixed("F", 1)).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedBytesRepresentation("int[]")));
    }

    #[test]
    fn fixed_checks_declared_size() {
        let md5 = Schema::fixed("Md5", 4);
        let ok = Datum::Fixed { name: Some("Md5".into()), bytes: vec![9, 8, 7, 6] };
        assert_eq!(convert(&ok, &md5).unwrap(), Value::Bytes(vec![9, 8, 7, 6]));

        let windowed = Datum::Buffer(ByteBuffer::with_window(vec![0, 1, 2, 3, 4, 5], 1, 5).unwrap());
        assert_eq!(convert(&windowed, &md5).unwrap(), Value::Bytes(vec![1, 2, 3, 4]));

        let short = Datum::ByteArray(vec![1, 2]);
        assert!(matches!(
            convert(&short, &md5),
            Err(ConvertError::FixedLengthMismatch { expected: 4, actual: 2 })
        ));
    }
}
