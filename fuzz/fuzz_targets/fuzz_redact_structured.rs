//! Fuzz target for redacting arbitrary generated value trees.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rf_common::{Mapping, Value, SENTINEL};
use rf_redact::{redact_in_place, RedactionRegistry};

#[derive(Debug, Arbitrary)]
enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<Node>),
    Map(Vec<(Key, Node)>),
}

#[derive(Debug, Arbitrary)]
enum Key {
    Password,
    Token,
    Other(String),
}

impl Key {
    fn name(&self) -> String {
        match self {
            Key::Password => "password".to_string(),
            Key::Token => "token".to_string(),
            Key::Other(s) => s.clone(),
        }
    }
}

fn build(node: &Node) -> Value {
    match node {
        Node::Null => Value::null(),
        Node::Bool(b) => Value::from(*b),
        Node::Int(i) => Value::from(*i),
        Node::Text(s) => Value::from(s.as_str()),
        Node::List(items) => Value::Sequence(items.iter().map(build).collect()),
        Node::Map(entries) => Value::Mapping(
            entries
                .iter()
                .map(|(k, v)| (k.name(), build(v)))
                .collect(),
        ),
    }
}

fn assert_redacted(map: &Mapping, registry: &RedactionRegistry) {
    for (key, value) in map {
        if registry.contains(key) {
            assert_eq!(value, &Value::string(SENTINEL));
            continue;
        }
        match value {
            Value::Mapping(inner) => assert_redacted(inner, registry),
            Value::Sequence(items) => {
                for item in items {
                    if let Value::Mapping(inner) = item {
                        assert_redacted(inner, registry);
                    }
                }
            }
            Value::Scalar(_) => {}
        }
    }
}

fuzz_target!(|entries: Vec<(Key, Node)>| {
    let registry = RedactionRegistry::from_names(["password", "token"]);
    let mut map: Mapping = entries
        .iter()
        .map(|(k, v)| (k.name(), build(v)))
        .collect();

    redact_in_place(&mut map, &registry);
    assert_redacted(&map, &registry);
});
