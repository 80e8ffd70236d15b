//! Order and byte-exactness properties of the dispatcher.

use ferry_api::Value;
use ferry_api::datum::{ByteBuffer, Datum};
use ferry_api::schema::{RecordField, Schema};
use ferry_engine::convert;
use proptest::prelude::*;

fn record_schema(names: &[String]) -> Schema {
    Schema::record(
        "Generated",
        names.iter().map(|n| RecordField::new(n.clone(), Schema::Int64)).collect(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn lists_keep_element_order(items in prop::collection::vec(any::<i64>(), 0..64)) {
        let input = Datum::List(items.iter().copied().map(Datum::Long).collect());
        let out = convert(&input, &Schema::array(Schema::Int64)).unwrap();
        let expected: Vec<Value> = items.into_iter().map(Value::Int64).collect();
        prop_assert_eq!(out, Value::Sequence(expected));
    }

    #[test]
    fn primitive_arrays_match_object_arrays(items in prop::collection::vec(any::<i32>(), 0..64)) {
        let schema = Schema::array(Schema::Int32);
        let primitive = convert(&Datum::Ints(items.clone()), &schema).unwrap();
        let boxed: Box<[Datum]> = items.into_iter().map(Datum::Int).collect();
        prop_assert_eq!(primitive, convert(&Datum::Objects(boxed), &schema).unwrap());
    }

    #[test]
    fn map_entries_keep_input_order(
        keys in prop::collection::btree_set("[a-z]{1,8}", 0..32),
        seed in any::<i64>(),
    ) {
        // btree_set gives unique keys; reverse them so input order is not sorted order.
        let keys: Vec<String> = keys.into_iter().rev().collect();
        let input = Datum::Map(
            keys.iter()
                .enumerate()
                .map(|(i, k)| (Datum::str(k.as_str()), Datum::Long(seed.wrapping_add(i as i64))))
                .collect(),
        );
        let Value::Mapping(entries) = convert(&input, &Schema::map(Schema::Int64)).unwrap() else {
            panic!("map schema must yield a mapping");
        };
        let out_keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        prop_assert_eq!(out_keys, keys.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn record_fields_follow_schema_order(
        names in prop::collection::hash_set("[a-z]{1,6}", 1..12),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let schema = record_schema(&names);
        // Supply the fields in reverse.
        let input = Datum::object(
            None,
            names.iter().enumerate().rev().map(|(i, n)| (n.clone(), Datum::Long(i as i64))),
        );
        let Value::Record(fields) = convert(&input, &schema).unwrap() else {
            panic!("record schema must yield a record");
        };
        for (i, ((name, value), declared)) in fields.iter().zip(&names).enumerate() {
            prop_assert_eq!(name, declared);
            prop_assert_eq!(value, &Value::Int64(i as i64));
        }
    }

    #[test]
    fn buffers_copy_exactly_their_window(
        backing in prop::collection::vec(any::<u8>(), 0..128),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let len = backing.len() + 1;
        let (mut position, mut limit) = (a.index(len), b.index(len));
        if position > limit {
            std::mem::swap(&mut position, &mut limit);
        }
        let expected = backing[position..limit].to_vec();
        let buffer = Datum::Buffer(ByteBuffer::with_window(backing, position, limit).unwrap());
        prop_assert_eq!(convert(&buffer, &Schema::Bytes).unwrap(), Value::Bytes(expected));
    }
}
