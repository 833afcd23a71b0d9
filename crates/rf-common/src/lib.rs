//! Shared foundations for redact-fields.
//!
//! This crate provides the types every other crate in the workspace builds on:
//! - The generic value model that payloads are decoded into
//! - The persisted registry artifact format
//! - Common error types with stable codes
//! - Configuration loading and resolution
//! - Output format specifications

pub mod artifact;
pub mod config;
pub mod error;
pub mod output;
pub mod value;

pub use artifact::ArtifactFormat;
pub use config::{Config, ConfigResolver, ConfigSource};
pub use error::{Error, Result};
pub use output::OutputFormat;
pub use value::{Mapping, Scalar, Value};

/// Fixed replacement literal for redacted values.
pub const SENTINEL: &str = "REDACTED";
