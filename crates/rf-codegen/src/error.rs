//! Error types for registry generation.

use std::path::PathBuf;
use thiserror::Error;

/// The artifact could not be created or written.
#[derive(Error, Debug)]
#[error("failed to write artifact {}: {source}", path.display())]
pub struct ArtifactWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors that can occur while generating or verifying the artifact.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Schema document could not be read
    #[error("failed to read schema {}: {source}", path.display())]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema document is not a valid type list
    #[error("failed to parse schema {}: {reason}", path.display())]
    SchemaParse { path: PathBuf, reason: String },

    /// Schema extension is not json, yaml, or yml
    #[error("unsupported schema format for {}: expected .json, .yaml or .yml", path.display())]
    UnsupportedSchemaFormat { path: PathBuf },

    #[error(transparent)]
    ArtifactWrite(#[from] ArtifactWriteError),

    /// Existing artifact could not be read during verification
    #[error("failed to read artifact {}: {source}", path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted artifact differs from a fresh rendering
    #[error("artifact {} is out of date with its schema", path.display())]
    Stale { path: PathBuf },

    /// Persisted artifact does not exist
    #[error("artifact {} does not exist", path.display())]
    Missing { path: PathBuf },
}

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

impl From<CodegenError> for rf_common::Error {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::SchemaRead { .. }
            | CodegenError::SchemaParse { .. }
            | CodegenError::UnsupportedSchemaFormat { .. } => {
                rf_common::Error::InvalidSchema(err.to_string())
            }
            CodegenError::ArtifactWrite(e) => rf_common::Error::ArtifactWrite {
                path: e.path.display().to_string(),
                reason: e.source.to_string(),
            },
            CodegenError::ArtifactRead { source, .. } => rf_common::Error::Io(source),
            CodegenError::Stale { path } => rf_common::Error::StaleArtifact {
                path: path.display().to_string(),
            },
            CodegenError::Missing { path } => rf_common::Error::MissingArtifact {
                path: path.display().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_artifact_write_message() {
        let err = ArtifactWriteError {
            path: PathBuf::from("/ro/fields.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to write artifact /ro/fields.toml: denied");
    }

    #[test]
    fn test_conversion_to_common_error() {
        let stale: rf_common::Error = CodegenError::Stale {
            path: PathBuf::from("gen/fields.toml"),
        }
        .into();
        assert_eq!(stale.code(), 21);

        let schema: rf_common::Error = CodegenError::UnsupportedSchemaFormat {
            path: PathBuf::from("schema.graphql"),
        }
        .into();
        match schema {
            rf_common::Error::InvalidSchema(msg) => assert!(msg.contains("schema.graphql")),
            other => panic!("expected InvalidSchema, got {:?}", other),
        }

        let write: rf_common::Error = CodegenError::from(ArtifactWriteError {
            path: PathBuf::from("out.toml"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        })
        .into();
        match write {
            rf_common::Error::ArtifactWrite { reason, .. } => assert_eq!(reason, "disk full"),
            other => panic!("expected ArtifactWrite, got {:?}", other),
        }
    }
}
