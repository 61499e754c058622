#![no_main]

use jsonc_heal_core::{heal, Options, Schema};
use libfuzzer_sys::fuzz_target;

// Accepts arbitrary bytes as a JSONC document and heals it against a fixed
// schema. Goal: no panics, and the healed text always parses.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let schema = Schema::object()
        .property("name", Schema::string().describe("name").with_default("x"))
        .property(
            "list",
            Schema::array(
                Schema::object()
                    .property("id", Schema::integer().with_default(1))
                    .build(),
            ),
        )
        .build();
    let healed = heal(&schema, text, &Options::default());
    assert!(jsonc_heal_core::jsonc::parse_value(&healed.text).is_ok());
});
