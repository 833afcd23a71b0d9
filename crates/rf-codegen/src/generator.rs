//! Registry artifact generation.
//!
//! Collects every field name carrying the marker directive, across every
//! type, and persists the sorted set. Names are deduplicated by name alone:
//! `User.password` and `Admin.password` produce a single `password` entry.
//! Each run overwrites the artifact wholesale.

use crate::error::{ArtifactWriteError, CodegenError, Result};
use crate::schema::SchemaDocument;
use rf_common::artifact::{self, ArtifactFormat};
use rf_common::config::{GeneratorSection, DEFAULT_DIRECTIVE};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inputs of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub schema: PathBuf,
    pub output: PathBuf,
    pub format: ArtifactFormat,
    pub directive: String,
}

impl GenerateOptions {
    pub fn new(schema: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            schema: schema.into(),
            output: output.into(),
            format: ArtifactFormat::default(),
            directive: DEFAULT_DIRECTIVE.to_string(),
        }
    }

    pub fn with_format(mut self, format: ArtifactFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = directive.into();
        self
    }
}

impl From<&GeneratorSection> for GenerateOptions {
    fn from(section: &GeneratorSection) -> Self {
        GenerateOptions {
            schema: section.schema.clone(),
            output: section.output.clone(),
            format: section.resolved_format(),
            directive: section.directive.clone(),
        }
    }
}

/// Summary of a generate or verify run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateReport {
    pub schema: PathBuf,
    pub output: PathBuf,
    pub format: ArtifactFormat,
    pub directive: String,
    pub types_scanned: usize,
    pub fields: Vec<String>,
}

/// Collect the sorted, deduplicated names of fields carrying `directive`.
pub fn collect_redacted_fields(schema: &SchemaDocument, directive: &str) -> Vec<String> {
    let fields: BTreeSet<&str> = schema
        .types
        .iter()
        .flat_map(|t| t.fields.iter())
        .filter(|f| f.has_directive(directive))
        .map(|f| f.name.as_str())
        .collect();
    fields.into_iter().map(str::to_string).collect()
}

/// Render the artifact for a schema without touching the filesystem.
pub fn render_artifact(schema: &SchemaDocument, directive: &str, format: ArtifactFormat) -> String {
    artifact::render(collect_redacted_fields(schema, directive), format)
}

/// Write artifact content, creating parent directories as needed.
pub fn write_artifact(path: &Path, content: &str) -> std::result::Result<(), ArtifactWriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ArtifactWriteError {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| ArtifactWriteError {
        path: path.to_path_buf(),
        source,
    })
}

fn prepare(options: &GenerateOptions) -> Result<(GenerateReport, String)> {
    let schema = SchemaDocument::load(&options.schema)?;
    let fields = collect_redacted_fields(&schema, &options.directive);
    debug!(
        schema = %options.schema.display(),
        types = schema.types.len(),
        field_definitions = schema.field_count(),
        redacted = fields.len(),
        "collected redacted fields"
    );

    let content = artifact::render(fields.iter().map(String::as_str), options.format);
    let report = GenerateReport {
        schema: options.schema.clone(),
        output: options.output.clone(),
        format: options.format,
        directive: options.directive.clone(),
        types_scanned: schema.types.len(),
        fields,
    };
    Ok((report, content))
}

/// Generate the artifact from the schema and overwrite the output file.
pub fn generate(options: &GenerateOptions) -> Result<GenerateReport> {
    let (report, content) = prepare(options)?;
    write_artifact(&options.output, &content)?;
    info!(
        output = %options.output.display(),
        format = %options.format,
        fields = report.fields.len(),
        "wrote redaction registry artifact"
    );
    Ok(report)
}

/// Check that the persisted artifact matches a fresh rendering byte for byte.
pub fn verify(options: &GenerateOptions) -> Result<GenerateReport> {
    let (report, expected) = prepare(options)?;

    let actual = match fs::read(&options.output) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CodegenError::Missing {
                path: options.output.clone(),
            })
        }
        Err(source) => {
            return Err(CodegenError::ArtifactRead {
                path: options.output.clone(),
                source,
            })
        }
    };

    if actual != expected.as_bytes() {
        debug!(
            output = %options.output.display(),
            expected_bytes = expected.len(),
            actual_bytes = actual.len(),
            "artifact differs from fresh rendering"
        );
        return Err(CodegenError::Stale {
            path: options.output.clone(),
        });
    }

    Ok(report)
}
