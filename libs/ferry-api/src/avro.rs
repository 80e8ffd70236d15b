//! Generic Avro datums as an external representation.
//!
//! Logical types expose their carrier: dates and millisecond times as
//! `Int32`, the remaining times and timestamps as `Int64`, uuids and big
//! decimals as text, fixed-point decimals as their two's-complement bytes.

use std::borrow::Cow;

use apache_avro::types::Value as AvroValue;

use crate::external::{ByName, Describe, External, Shape};

impl Describe for AvroValue {
    fn describe(&self) -> Option<Cow<'_, str>> {
        match self {
            AvroValue::String(s) | AvroValue::Enum(_, s) => Some(Cow::Borrowed(s.as_str())),
            AvroValue::Boolean(b) => Some(Cow::Owned(b.to_string())),
            AvroValue::Int(i) | AvroValue::Date(i) | AvroValue::TimeMillis(i) => {
                Some(Cow::Owned(i.to_string()))
            }
            AvroValue::Long(l)
            | AvroValue::TimeMicros(l)
            | AvroValue::TimestampMillis(l)
            | AvroValue::TimestampMicros(l)
            | AvroValue::TimestampNanos(l)
            | AvroValue::LocalTimestampMillis(l)
            | AvroValue::LocalTimestampMicros(l)
            | AvroValue::LocalTimestampNanos(l) => Some(Cow::Owned(l.to_string())),
            AvroValue::Float(f) => Some(Cow::Owned(f.to_string())),
            AvroValue::Double(d) => Some(Cow::Owned(d.to_string())),
            AvroValue::Uuid(u) => Some(Cow::Owned(u.to_string())),
            AvroValue::BigDecimal(d) => Some(Cow::Owned(d.to_string())),
            AvroValue::Union(_, inner) => inner.describe(),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            AvroValue::Null => "avro null",
            AvroValue::Boolean(_) => "avro boolean",
            AvroValue::Int(_) => "avro int",
            AvroValue::Long(_) => "avro long",
            AvroValue::Float(_) => "avro float",
            AvroValue::Double(_) => "avro double",
            AvroValue::Bytes(_) => "avro bytes",
            AvroValue::String(_) => "avro string",
            AvroValue::Fixed(..) => "avro fixed",
            AvroValue::Enum(..) => "avro enum",
            AvroValue::Union(..) => "avro union",
            AvroValue::Array(_) => "avro array",
            AvroValue::Map(_) => "avro map",
            AvroValue::Record(_) => "avro record",
            AvroValue::Date(_) => "avro date",
            AvroValue::Decimal(_) => "avro decimal",
            AvroValue::BigDecimal(_) => "avro big-decimal",
            AvroValue::TimeMillis(_) => "avro time-millis",
            AvroValue::TimeMicros(_) => "avro time-micros",
            AvroValue::TimestampMillis(_) => "avro timestamp-millis",
            AvroValue::TimestampMicros(_) => "avro timestamp-micros",
            AvroValue::TimestampNanos(_) => "avro timestamp-nanos",
            AvroValue::LocalTimestampMillis(_) => "avro local-timestamp-millis",
            AvroValue::LocalTimestampMicros(_) => "avro local-timestamp-micros",
            AvroValue::LocalTimestampNanos(_) => "avro local-timestamp-nanos",
            AvroValue::Duration(_) => "avro duration",
            AvroValue::Uuid(_) => "avro uuid",
        }
    }
}

impl External for AvroValue {
    fn shape(&self) -> Shape<'_, Self> {
        match self {
            AvroValue::Null => Shape::Absent,
            AvroValue::Boolean(b) => Shape::Bool(*b),
            AvroValue::Int(i) | AvroValue::Date(i) | AvroValue::TimeMillis(i) => Shape::Int32(*i),
            AvroValue::Long(l)
            | AvroValue::TimeMicros(l)
            | AvroValue::TimestampMillis(l)
            | AvroValue::TimestampMicros(l)
            | AvroValue::TimestampNanos(l)
            | AvroValue::LocalTimestampMillis(l)
            | AvroValue::LocalTimestampMicros(l)
            | AvroValue::LocalTimestampNanos(l) => Shape::Int64(*l),
            AvroValue::Float(f) => Shape::Float32(*f),
            AvroValue::Double(d) => Shape::Float64(*d),
            AvroValue::Bytes(b) | AvroValue::Fixed(_, b) => Shape::FlatBytes(Cow::Borrowed(b.as_slice())),
            AvroValue::Decimal(d) => match Vec::<u8>::try_from(d) {
                Ok(bytes) => Shape::FlatBytes(Cow::Owned(bytes)),
                Err(_) => Shape::Unrecognized,
            },
            AvroValue::String(s) | AvroValue::Enum(_, s) => Shape::Text(Cow::Borrowed(s.as_str())),
            AvroValue::Uuid(u) => Shape::Text(Cow::Owned(u.to_string())),
            AvroValue::BigDecimal(d) => Shape::Text(Cow::Owned(d.to_string())),
            AvroValue::Array(items) => Shape::ObjectArray(items.as_slice()),
            AvroValue::Map(entries) => Shape::Association(Box::new(
                entries.iter().map(|(k, v)| (k as &dyn Describe, v)),
            )),
            AvroValue::Record(fields) => Shape::Record(Box::new(ByName::new(fields.as_slice()))),
            AvroValue::Union(index, inner) => Shape::Branch {
                index: *index as usize,
                value: &**inner,
            },
            AvroValue::Duration(_) => Shape::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn logical_types_expose_their_carrier() {
        assert!(matches!(AvroValue::Date(19_000).shape(), Shape::Int32(19_000)));
        assert!(matches!(AvroValue::TimestampMicros(5).shape(), Shape::Int64(5)));
        assert!(matches!(AvroValue::Enum(1, "SELL".into()).shape(), Shape::Text(t) if t == "SELL"));
        assert_eq!(AvroValue::Fixed(2, vec![1, 2]).shape().label(), "bytes");
    }

    #[test]
    fn containers_classify_structurally() {
        let map = AvroValue::Map(HashMap::from([("k".to_string(), AvroValue::Int(1))]));
        assert_eq!(map.shape().label(), "association");
        let record = AvroValue::Record(vec![("x".into(), AvroValue::Long(1))]);
        assert_eq!(record.shape().label(), "record");
        let union = AvroValue::Union(1, Box::new(AvroValue::String("a".into())));
        assert!(matches!(union.shape(), Shape::Branch { index: 1, .. }));
        assert_eq!(union.describe().as_deref(), Some("a"));
    }
}
