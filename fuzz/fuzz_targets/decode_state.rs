#![no_main]

use codec::{CodecLimits, CustomId, StateData};
use libfuzzer_sys::fuzz_target;
use schema::{FieldDef, Schema};

fn fuzz_schema() -> Schema {
    Schema::builder()
        .field("text", FieldDef::string())
        .field("count", FieldDef::int().with_default(0))
        .field("flag", FieldDef::boolean())
        .field("items", FieldDef::list())
        .field("mode", FieldDef::choice(["a", "b", "c"]).expect("valid options"))
        .field("at", FieldDef::timestamp())
        .build()
        .expect("valid schema")
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let schema = fuzz_schema();
    let limits = CodecLimits::for_testing();

    if let Ok(state) = StateData::decode_with_limits(&schema, text, &limits) {
        // Decoded state re-encodes to something that decodes to the same state.
        let encoded = state.encode().expect("decoded state must encode");
        let again = StateData::decode_with_limits(&schema, &encoded, &CodecLimits::unlimited())
            .expect("re-encoded state must decode");
        assert_eq!(again, state);
    }

    if let Ok(id) = CustomId::parse(text, &limits) {
        let _ = id.decode(&schema, &limits);
    }
});
