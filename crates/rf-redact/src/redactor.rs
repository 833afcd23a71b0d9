//! Recursive field-name redactor.
//!
//! The redactor works on a private copy produced by the [`CopyEngine`]; the
//! caller's payload is never touched. Every key found in the registry has its
//! whole value replaced by [`SENTINEL`], at any depth. Matched subtrees are not
//! visited further.
//!
//! Sequences are only searched one level deep: mapping elements are recursed
//! into, while nested sequences are left as they are. A mapping inside a
//! sequence inside a sequence is therefore not redacted.

use crate::copy::{CopyEngine, CopyError};
use crate::registry::RedactionRegistry;
use rf_common::value::{Mapping, Value};
use rf_common::SENTINEL;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Redact registered keys in place.
///
/// Only ever call this on an owned copy of the payload.
pub fn redact_in_place(map: &mut Mapping, registry: &RedactionRegistry) {
    for (key, value) in map.iter_mut() {
        if registry.contains(key) {
            *value = Value::string(SENTINEL);
            continue;
        }

        match value {
            Value::Scalar(_) => {}
            Value::Mapping(inner) => redact_in_place(inner, registry),
            Value::Sequence(items) => {
                for item in items.iter_mut() {
                    if let Value::Mapping(inner) = item {
                        redact_in_place(inner, registry);
                    }
                }
            }
        }
    }
}

/// Copy a payload and redact the copy, surfacing copy failures.
pub fn try_redact_with<T>(
    engine: &CopyEngine,
    registry: &RedactionRegistry,
    payload: &T,
) -> Result<Mapping, CopyError>
where
    T: Serialize + ?Sized,
{
    let mut copy = engine.copy(payload)?;
    redact_in_place(&mut copy, registry);
    Ok(copy)
}

/// Copy a payload and redact the copy.
///
/// If the payload cannot be copied the failure is logged and an empty mapping
/// is returned: nothing is better than something unredacted.
pub fn redact_with<T>(engine: &CopyEngine, registry: &RedactionRegistry, payload: &T) -> Mapping
where
    T: Serialize + ?Sized,
{
    match try_redact_with(engine, registry, payload) {
        Ok(redacted) => redacted,
        Err(err) => {
            error!(
                error = %err,
                "failed to deep copy payload for redaction; substituting an empty mapping"
            );
            Mapping::new()
        }
    }
}

/// Redact a payload against a registry using the built-in copy shapes.
///
/// ```
/// use rf_redact::{redact_fields_in_map, RedactionRegistry};
/// use serde_json::json;
///
/// let registry = RedactionRegistry::from_names(["password"]);
/// let payload = json!({"user": "alice", "password": "hunter2"});
///
/// let redacted = redact_fields_in_map(&payload, &registry);
/// assert_eq!(redacted["password"].as_str(), Some("REDACTED"));
/// assert_eq!(payload["password"], "hunter2");
/// ```
pub fn redact_fields_in_map<T>(payload: &T, registry: &RedactionRegistry) -> Mapping
where
    T: Serialize + ?Sized,
{
    redact_with(&CopyEngine::new(), registry, payload)
}

/// A registry paired with a copy engine, shareable across request handlers.
#[derive(Debug, Clone)]
pub struct Redactor {
    registry: Arc<RedactionRegistry>,
    engine: CopyEngine,
}

impl Redactor {
    /// Create a redactor that copies only the built-in shapes.
    pub fn new(registry: impl Into<Arc<RedactionRegistry>>) -> Self {
        Self::with_engine(registry, CopyEngine::new())
    }

    /// Create a redactor with a configured copy engine.
    pub fn with_engine(registry: impl Into<Arc<RedactionRegistry>>, engine: CopyEngine) -> Self {
        Redactor {
            registry: registry.into(),
            engine,
        }
    }

    pub fn registry(&self) -> &RedactionRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &CopyEngine {
        &self.engine
    }

    /// Redact a payload, falling back to an empty mapping on copy failure.
    pub fn redact<T>(&self, payload: &T) -> Mapping
    where
        T: Serialize + ?Sized,
    {
        redact_with(&self.engine, &self.registry, payload)
    }

    /// Redact a payload, returning the copy failure instead of recovering.
    pub fn try_redact<T>(&self, payload: &T) -> Result<Mapping, CopyError>
    where
        T: Serialize + ?Sized,
    {
        try_redact_with(&self.engine, &self.registry, payload)
    }
}
