//! Tool Settings - optional JSON file, every field defaulted

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Invalid config {0}: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SanitizerConfig {
    /// Extension of the rendered artifact removed next to the LaTeX file
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
    /// Fail when the rendered artifact does not exist
    #[serde(default = "default_true")]
    pub require_artifact: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Header declaring `XXH32`
    #[serde(default = "default_hash_header")]
    pub hash_header: String,
    /// Emit a comment naming the source file and its SHA-256
    #[serde(default = "default_true")]
    pub provenance: bool,
}

fn default_true() -> bool { true }
fn default_artifact_extension() -> String { "pdf".to_string() }
fn default_hash_header() -> String { "xxhash.h".to_string() }

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            artifact_extension: default_artifact_extension(),
            require_artifact: true,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            hash_header: default_hash_header(),
            provenance: true,
        }
    }
}

impl ToolConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
