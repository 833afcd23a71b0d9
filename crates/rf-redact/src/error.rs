//! Error types for the redaction runtime.

use crate::copy::CopyError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactError>;

/// Errors that can occur while loading the registry or copying a payload.
#[derive(Error, Debug)]
pub enum RedactError {
    /// The registry artifact could not be read.
    #[error("failed to read registry artifact {}: {source}", path.display())]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry artifact is not a valid TOML artifact.
    #[error("invalid registry artifact {path}: {reason}")]
    RegistryParse { path: String, reason: String },

    /// The artifact rendering cannot be loaded at runtime.
    #[error(
        "registry artifact {} is Rust source; include it at build time and use RedactionRegistry::from_static",
        path.display()
    )]
    CompiledArtifact { path: PathBuf },

    /// The payload could not be deep-copied.
    #[error(transparent)]
    Copy(#[from] CopyError),
}

impl From<RedactError> for rf_common::Error {
    fn from(err: RedactError) -> Self {
        match err {
            RedactError::RegistryRead { path, source }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                rf_common::Error::MissingArtifact {
                    path: path.display().to_string(),
                }
            }
            RedactError::RegistryRead { source, .. } => rf_common::Error::Io(source),
            RedactError::RegistryParse { path, reason } => {
                rf_common::Error::InvalidArtifact(format!("{}: {}", path, reason))
            }
            err @ RedactError::CompiledArtifact { .. } => {
                rf_common::Error::InvalidArtifact(err.to_string())
            }
            RedactError::Copy(err) => rf_common::Error::Copy(err.to_string()),
        }
    }
}
