//! The runtime redaction registry.
//!
//! A [`RedactionRegistry`] is the set of field names whose values must never
//! reach a log. It is built once at startup, either from the persisted TOML
//! artifact or from a Rust artifact compiled into the binary, and is
//! read-only afterwards. Membership is plain string equality: no case folding
//! and no normalization.

use crate::error::{RedactError, Result};
use rf_common::artifact::{self, ArtifactFormat};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Immutable set of sensitive field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionRegistry {
    fields: HashSet<String>,
}

impl RedactionRegistry {
    /// Build a registry from field names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RedactionRegistry {
            fields: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a registry from a compiled-in Rust artifact.
    ///
    /// ```
    /// use rf_redact::RedactionRegistry;
    ///
    /// static REDACTED_FIELDS: &[(&str, bool)] = &[("password", true), ("token", true)];
    ///
    /// let registry = RedactionRegistry::from_static(REDACTED_FIELDS);
    /// assert!(registry.contains("token"));
    /// ```
    pub fn from_static(entries: &[(&str, bool)]) -> Self {
        Self::from_names(
            entries
                .iter()
                .filter(|(_, enabled)| *enabled)
                .map(|(name, _)| *name),
        )
    }

    /// Parse a registry from TOML artifact text.
    pub fn from_artifact_str(content: &str) -> Result<Self> {
        Self::parse(content, "<memory>")
    }

    /// Load the registry from a persisted TOML artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if ArtifactFormat::from_path(path) == Some(ArtifactFormat::Rust) {
            return Err(RedactError::CompiledArtifact {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| RedactError::RegistryRead {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::parse(&content, &path.display().to_string())?;

        debug!(
            path = %path.display(),
            fields = registry.len(),
            "loaded redaction registry"
        );
        Ok(registry)
    }

    fn parse(content: &str, origin: &str) -> Result<Self> {
        let names = artifact::parse_toml(content).map_err(|e| RedactError::RegistryParse {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_names(names))
    }

    /// Whether a key is registered as sensitive.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Registered names in byte order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
