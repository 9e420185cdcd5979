use std::time::Duration;

use codec::{FieldDef, FieldValue, Schema, StateData};
use proptest::prelude::*;
use schema::{from_unix_seconds, TIMESTAMP_EPOCH_SECS};

const OPTIONS: [&str; 4] = ["solo", "team", "ffa", "q"];

fn schema() -> Schema {
    Schema::builder()
        .field("text", FieldDef::string())
        .field("count", FieldDef::int())
        .field("flag", FieldDef::boolean())
        .field("items", FieldDef::list())
        .field("mode", FieldDef::choice(OPTIONS).unwrap())
        .field("at", FieldDef::timestamp())
        .build()
        .unwrap()
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![Just('q'), Just('j'), Just('z'), any::<char>()],
        0..12,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// One `(field, value)` assignment valid for [`schema`].
fn assignment() -> impl Strategy<Value = (&'static str, FieldValue)> {
    prop_oneof![
        text().prop_map(|t| ("text", FieldValue::String(t))),
        any::<i64>().prop_map(|i| ("count", FieldValue::Int(i))),
        any::<bool>().prop_map(|b| ("flag", FieldValue::Boolean(b))),
        prop::collection::vec(text(), 0..5).prop_map(|items| ("items", FieldValue::List(items))),
        prop::sample::select(OPTIONS.to_vec()).prop_map(|o| ("mode", FieldValue::choice(o))),
        (-1_000_000_000i64..1_000_000_000).prop_map(|delta| {
            let at = from_unix_seconds(TIMESTAMP_EPOCH_SECS + delta).unwrap();
            ("at", FieldValue::Timestamp(at))
        }),
    ]
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(assignments in prop::collection::vec(assignment(), 0..10)) {
        let schema = schema();
        let mut state = StateData::new(&schema);
        for (name, value) in &assignments {
            state.save(name, value.clone()).unwrap();
        }

        let encoded = state.encode().unwrap();
        let decoded = StateData::decode(&schema, &encoded).unwrap();
        for (name, value) in state.iter() {
            prop_assert_eq!(decoded.get(name).unwrap(), Some(value));
        }
        prop_assert_eq!(decoded.len(), state.len());
    }

    #[test]
    fn prop_derive_leaves_source_alone(
        base in assignment(),
        next in assignment(),
    ) {
        let schema = schema();
        let mut a = StateData::new(&schema);
        a.save(base.0, base.1.clone()).unwrap();
        let before = a.encode().unwrap();

        let b = a.derive(next.0, next.1.clone()).unwrap();
        prop_assert_eq!(b.get(next.0).unwrap(), Some(&next.1));
        prop_assert_eq!(a.encode().unwrap(), before);
    }

    #[test]
    fn prop_decode_never_panics(input in "[0-9a-zqjz!é]{0,40}") {
        let schema = schema();
        let _ = StateData::decode(&schema, &input);
    }

    #[test]
    fn prop_sub_second_timestamps_compare_equal(millis in 0u64..1000) {
        let schema = schema();
        let at = from_unix_seconds(TIMESTAMP_EPOCH_SECS).unwrap();
        let mut state = StateData::new(&schema);
        state.save("at", at + Duration::from_millis(millis)).unwrap();
        prop_assert!(state.is("at", at).unwrap());
    }
}
