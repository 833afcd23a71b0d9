//! Configuration loading for redact-fields.
//!
//! This module provides:
//! - Typed configuration sections for the registry and the generator
//! - Deterministic config resolution (CLI > env > XDG > defaults)
//! - Source metadata (path, content hash) for audit logging

pub mod resolve;

pub use resolve::ConfigResolver;

use crate::artifact::ArtifactFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directive that marks a schema field as sensitive.
pub const DEFAULT_DIRECTIVE: &str = "redactSecrets";

/// Default location of the persisted registry artifact.
pub const DEFAULT_ARTIFACT_PATH: &str = "redacted_fields.toml";

/// Default location of the compiled schema document.
pub const DEFAULT_SCHEMA_PATH: &str = "schema.json";

/// The complete loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the runtime registry is loaded from.
    pub registry: RegistrySection,
    /// Build-time generator settings.
    pub generator: GeneratorSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySection {
    pub path: PathBuf,
}

impl Default for RegistrySection {
    fn default() -> Self {
        RegistrySection {
            path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSection {
    /// Compiled schema document (JSON or YAML).
    pub schema: PathBuf,
    /// Artifact output path.
    pub output: PathBuf,
    /// Artifact rendering; inferred from `output` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ArtifactFormat>,
    /// Marker directive name.
    pub directive: String,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        GeneratorSection {
            schema: PathBuf::from(DEFAULT_SCHEMA_PATH),
            output: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            format: None,
            directive: DEFAULT_DIRECTIVE.to_string(),
        }
    }
}

impl GeneratorSection {
    /// The configured rendering, else the one implied by `output`'s extension.
    pub fn resolved_format(&self) -> ArtifactFormat {
        self.format
            .or_else(|| ArtifactFormat::from_path(&self.output))
            .unwrap_or_default()
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Validate configuration semantically.
    pub fn validate(&self) -> Result<()> {
        if self.registry.path.as_os_str().is_empty() {
            return Err(Error::Config("registry.path must not be empty".into()));
        }
        if self.generator.schema.as_os_str().is_empty() {
            return Err(Error::Config("generator.schema must not be empty".into()));
        }
        if self.generator.output.as_os_str().is_empty() {
            return Err(Error::Config("generator.output must not be empty".into()));
        }
        if self.generator.directive.trim().is_empty() {
            return Err(Error::Config("generator.directive must not be empty".into()));
        }
        Ok(())
    }
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file, or None if using defaults
    pub path: Option<PathBuf>,
    /// SHA-256 of the file contents, or None if defaults
    pub hash: Option<String>,
    /// How the source was resolved
    pub resolution: ConfigResolution,
}

impl ConfigSource {
    pub fn defaults() -> Self {
        ConfigSource {
            path: None,
            hash: None,
            resolution: ConfigResolution::Default,
        }
    }
}

/// How a config file was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigResolution {
    /// From explicit CLI flag
    CliFlag,
    /// From environment variable
    EnvVar,
    /// From XDG config directory
    XdgConfig,
    /// Using built-in defaults
    Default,
}

impl std::fmt::Display for ConfigResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigResolution::CliFlag => write!(f, "cli"),
            ConfigResolution::EnvVar => write!(f, "env"),
            ConfigResolution::XdgConfig => write!(f, "xdg"),
            ConfigResolution::Default => write!(f, "default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generator.directive, DEFAULT_DIRECTIVE);
        assert_eq!(config.registry.path, PathBuf::from(DEFAULT_ARTIFACT_PATH));
        assert_eq!(config.generator.resolved_format(), ArtifactFormat::Toml);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [generator]
            schema = "graphql/schema.yaml"
            format = "rust"
            "#,
        )
        .unwrap();

        assert_eq!(config.generator.schema, PathBuf::from("graphql/schema.yaml"));
        assert_eq!(config.generator.format, Some(ArtifactFormat::Rust));
        assert_eq!(config.generator.directive, DEFAULT_DIRECTIVE);
        assert_eq!(config.registry, RegistrySection::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_toml("[registry]\npaht = \"x\"\n").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_directive() {
        let mut config = Config::default();
        config.generator.directive = "  ".into();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_format_inferred_from_output_extension() {
        let config = Config::from_toml("[generator]\noutput = \"src/gen.rs\"\n").unwrap();
        assert_eq!(config.generator.format, None);
        assert_eq!(config.generator.resolved_format(), ArtifactFormat::Rust);

        let pinned =
            Config::from_toml("[generator]\noutput = \"src/gen.rs\"\nformat = \"toml\"\n")
                .unwrap();
        assert_eq!(pinned.generator.resolved_format(), ArtifactFormat::Toml);
    }

    #[test]
    fn test_copy_section_rejected() {
        let err = Config::from_toml("[copy]\nregistered_types = [\"KeyValuePair\"]\n");
        assert!(matches!(err, Err(Error::Toml(_))));
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(ConfigResolution::CliFlag.to_string(), "cli");
        assert_eq!(ConfigResolution::Default.to_string(), "default");
    }
}
