//! Build-time generator for the redaction registry artifact.
//!
//! Reads the compiled schema document, collects every field marked with the
//! redaction directive, and writes the sorted name set as a generated
//! artifact that the runtime registry loads (TOML) or compiles in (Rust).
//!
//! ```no_run
//! use rf_codegen::{generate, GenerateOptions};
//!
//! let options = GenerateOptions::new("schema.yaml", "gen/redacted_fields.toml");
//! let report = generate(&options)?;
//! println!("{} redacted fields", report.fields.len());
//! # Ok::<(), rf_codegen::CodegenError>(())
//! ```

pub mod error;
pub mod generator;
pub mod schema;

pub use error::{ArtifactWriteError, CodegenError, Result};
pub use generator::{
    collect_redacted_fields, generate, render_artifact, verify, write_artifact, GenerateOptions,
    GenerateReport,
};
pub use schema::{Directive, FieldDefinition, SchemaDocument, SchemaFormat, TypeDefinition};
