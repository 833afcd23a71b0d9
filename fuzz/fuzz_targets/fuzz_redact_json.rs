//! Fuzz target for redacting decoded JSON payloads.
//!
//! Checks that redaction never panics, never mutates its input, and is
//! idempotent.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rf_common::Value;
use rf_redact::{redact_fields_in_map, RedactionRegistry};

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let registry = RedactionRegistry::from_names(["password", "token", "a"]);
    let snapshot = payload.clone();

    let once = redact_fields_in_map(&payload, &registry);
    assert_eq!(payload, snapshot);

    let twice = redact_fields_in_map(&once, &registry);
    assert_eq!(once, twice);
});
