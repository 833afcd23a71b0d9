//! Error types shared across redact-fields crates.
//!
//! Every error carries a stable numeric code, a category, a recoverability
//! hint and a remediation string, so the CLI can report failures both to
//! humans (stderr) and to automation (structured JSON).
//!
//! ```text
//! ✗ Stale Registry Artifact
//!   Reason: artifact gen/redacted_fields.toml is out of date with its schema
//!   Fix: Run 'rf-core generate' and commit the regenerated artifact.
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for redact-fields operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Config file, schema document, or artifact contents.
    Config,
    /// Generating or checking the persisted registry artifact.
    Artifact,
    /// Copying or redacting a payload.
    Redaction,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Artifact => write!(f, "artifact"),
            ErrorCategory::Redaction => write!(f, "redaction"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("invalid registry artifact: {0}")]
    InvalidArtifact(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // Artifact errors (20-29)
    #[error("failed to write artifact {path}: {reason}")]
    ArtifactWrite { path: String, reason: String },

    #[error("artifact {path} is out of date with its schema")]
    StaleArtifact { path: String },

    #[error("artifact {path} does not exist")]
    MissingArtifact { path: String },

    // Redaction errors (30-39)
    #[error("payload copy failed: {0}")]
    Copy(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code.
    ///
    /// - 10-19: Configuration errors
    /// - 20-29: Artifact errors
    /// - 30-39: Redaction errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSchema(_) => 11,
            Error::InvalidArtifact(_) => 12,
            Error::Toml(_) => 13,
            Error::ArtifactWrite { .. } => 20,
            Error::StaleArtifact { .. } => 21,
            Error::MissingArtifact { .. } => 22,
            Error::Copy(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::InvalidSchema(_)
            | Error::InvalidArtifact(_)
            | Error::Toml(_) => ErrorCategory::Config,
            Error::ArtifactWrite { .. }
            | Error::StaleArtifact { .. }
            | Error::MissingArtifact { .. } => ErrorCategory::Artifact,
            Error::Copy(_) => ErrorCategory::Redaction,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether the error can be resolved by user action.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::InvalidSchema(_) => true,
            Error::InvalidArtifact(_) => true,
            Error::Toml(_) => true,
            Error::ArtifactWrite { .. } => true,
            Error::StaleArtifact { .. } => true,
            Error::MissingArtifact { .. } => true,
            // Payload shape is decided by the caller's types.
            Error::Copy(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Check the config file passed with '--config' or set in RF_CONFIG.",
            Error::InvalidSchema(_) => {
                "Re-run the schema compiler and make sure it emits a 'types' list."
            }
            Error::InvalidArtifact(_) => {
                "The artifact is generated. Regenerate it with 'rf-core generate' instead of editing it."
            }
            Error::Toml(_) => "Fix the TOML syntax, or regenerate the file if it is generated.",
            Error::ArtifactWrite { .. } => {
                "Check that the output directory is writable and has free space."
            }
            Error::StaleArtifact { .. } => {
                "Run 'rf-core generate' and commit the regenerated artifact."
            }
            Error::MissingArtifact { .. } => "Run 'rf-core generate' to create the artifact.",
            Error::Copy(_) => {
                "Pass a JSON object as the payload; only mappings can be redacted."
            }
            Error::Io(_) => "Check file paths and permissions, then retry.",
            Error::Json(_) => "Input is not valid JSON. Check it with 'jq .'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidSchema(_) => "Invalid Schema",
            Error::InvalidArtifact(_) => "Invalid Registry Artifact",
            Error::Toml(_) => "TOML Parse Error",
            Error::ArtifactWrite { .. } => "Artifact Write Failed",
            Error::StaleArtifact { .. } => "Stale Registry Artifact",
            Error::MissingArtifact { .. } => "Missing Registry Artifact",
            Error::Copy(_) => "Payload Copy Failed",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub recoverable: bool,
    pub remediation: String,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            remediation: err.remediation().to_string(),
        }
    }
}

impl StructuredError {
    /// Serialize to a compact JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"message":"serialization failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
