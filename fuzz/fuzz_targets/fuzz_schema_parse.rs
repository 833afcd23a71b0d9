//! Fuzz target for schema document parsing (JSON and YAML).

#![no_main]

use libfuzzer_sys::fuzz_target;
use rf_codegen::{collect_redacted_fields, SchemaDocument, SchemaFormat};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for format in [SchemaFormat::Json, SchemaFormat::Yaml] {
        if let Ok(schema) = SchemaDocument::parse_str(text, format) {
            let fields = collect_redacted_fields(&schema, "redactSecrets");
            assert!(fields.windows(2).all(|w| w[0] < w[1]));
        }
    }
});
