//! Field-name redaction for logged payloads.
//!
//! This crate keeps secrets out of observability output when arbitrary,
//! deeply nested request/response payloads are logged.
//!
//! # Key Features
//!
//! - **Name-based registry**: sensitive fields are identified by exact key
//!   name, loaded once from a generated artifact and immutable afterwards.
//! - **Deep copy isolation**: payloads are copied into an owned value tree
//!   before anything is replaced, so the caller's data is never mutated.
//! - **Subtree suppression**: a matched key's whole value becomes `REDACTED`.
//! - **Fail-safe**: if a payload cannot be copied, an empty mapping is logged
//!   instead of anything partially redacted.
//!
//! # Example
//!
//! ```
//! use rf_redact::{RedactionRegistry, Redactor};
//! use serde_json::json;
//!
//! let registry = RedactionRegistry::from_names(["password", "token"]);
//! let redactor = Redactor::new(registry);
//!
//! let payload = json!({"login": {"user": "alice", "password": "hunter2"}});
//! let redacted = redactor.redact(&payload);
//!
//! assert_eq!(redacted["login"].get("password").and_then(|v| v.as_str()), Some("REDACTED"));
//! ```

pub mod copy;
pub mod error;
pub mod log;
pub mod redactor;
pub mod registry;

pub use copy::{CopyEngine, CopyError};
pub use error::{RedactError, Result};
pub use log::log_request_variables;
pub use redactor::{redact_fields_in_map, redact_in_place, Redactor};
pub use registry::RedactionRegistry;
pub use rf_common::SENTINEL;
