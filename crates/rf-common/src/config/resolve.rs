//! Configuration resolution.
//!
//! Resolution order:
//! 1. Explicit CLI flag (`--config`)
//! 2. `RF_CONFIG` environment variable
//! 3. `$XDG_CONFIG_HOME/redact-fields/config.toml` (or the platform config dir)
//! 4. Built-in defaults

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::{Config, ConfigResolution, ConfigSource};
use crate::error::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RF_CONFIG";

/// Directory name under the user config dir.
pub const CONFIG_DIR_NAME: &str = "redact-fields";

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration resolver with deterministic resolution order.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver with an optional CLI-provided path.
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        ConfigResolver { cli_path }
    }

    /// Resolve the config file path.
    ///
    /// CLI and env paths are returned even if the file is missing so that
    /// loading reports the error; the XDG path only counts when it exists.
    pub fn resolve_path(&self) -> (Option<PathBuf>, ConfigResolution) {
        if let Some(ref path) = self.cli_path {
            return (Some(path.clone()), ConfigResolution::CliFlag);
        }

        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return (Some(PathBuf::from(path)), ConfigResolution::EnvVar);
            }
        }

        if let Some(dir) = resolve_config_dir() {
            let path = dir.join(CONFIG_FILE_NAME);
            if path.exists() {
                return (Some(path), ConfigResolution::XdgConfig);
            }
        }

        (None, ConfigResolution::Default)
    }

    /// Load the resolved config, or defaults when nothing resolved.
    pub fn load(&self) -> Result<(Config, ConfigSource)> {
        let (path, resolution) = self.resolve_path();

        let Some(path) = path else {
            return Ok((Config::default(), ConfigSource::defaults()));
        };

        let (config, hash) = load_file(&path)?;
        config.validate()?;

        Ok((
            config,
            ConfigSource {
                path: Some(path),
                hash: Some(hash),
                resolution,
            },
        ))
    }
}

fn resolve_config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join(CONFIG_DIR_NAME));
        }
    }
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME))
}

fn load_file(path: &Path) -> Result<(Config, String)> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("failed to read config from {}: {}", path.display(), e))
    })?;
    let hash = compute_sha256(&content);
    let config = Config::from_toml(&content).map_err(|e| {
        Error::Config(format!("failed to parse config {}: {}", path.display(), e))
    })?;
    Ok((config, hash))
}

/// Hex-encoded SHA-256 of a string.
pub fn compute_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
