//! Codec configuration and config file loading.
//!
//! Loads from TOML (or JSON, detected by extension). Every key is optional;
//! absent keys keep the defaults.
//!
//! ```toml
//! [encode]
//! repeated = "packed"        # or "expanded"
//!
//! [decode]
//! max_message_bytes = 67108864
//! max_group_depth = 32
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tensor_codec_wire::{RepeatedEncoding, DEFAULT_MAX_GROUP_DEPTH, MAX_GROUP_DEPTH_LIMIT};

/// Complete codec configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// `[encode]`
    pub encode: EncodeConfig,
    /// `[decode]`
    pub decode: DecodeConfig,
}

/// Writer-side settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Form used for `shape`, `strides`, `mask` and `mask_is_soft`.
    pub repeated: RepeatedEncoding,
}

/// Reader-side limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Reject inputs longer than this before scanning. `None` means unlimited.
    pub max_message_bytes: Option<usize>,
    /// Nesting limit when skipping unknown groups; 0 rejects unknown groups.
    /// At most [`MAX_GROUP_DEPTH_LIMIT`].
    pub max_group_depth: u32,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: None,
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decode.max_message_bytes == Some(0) {
            return Err(ConfigError::InvalidValue(
                "decode.max_message_bytes must be positive (omit it for no limit)".into(),
            ));
        }
        if self.decode.max_group_depth > MAX_GROUP_DEPTH_LIMIT {
            return Err(ConfigError::InvalidValue(format!(
                "decode.max_group_depth must be at most {MAX_GROUP_DEPTH_LIMIT}, got {}",
                self.decode.max_group_depth
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            detail: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            detail: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Config file loading
// ---------------------------------------------------------------------------

/// Load a config file from the given path. Detects format by extension:
/// `.json` selects JSON, everything else TOML. An empty file yields defaults.
pub fn load_config(path: &Path) -> Result<CodecConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if content.trim().is_empty() {
        tracing::debug!(path = %path.display(), "empty codec config, using defaults");
        return Ok(CodecConfig::default());
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        CodecConfig::from_json_str(&content)
    } else {
        CodecConfig::from_toml_str(&content)
    };
    let config = parsed.map_err(|e| e.with_path(path))?;

    tracing::debug!(
        path = %path.display(),
        repeated = ?config.encode.repeated,
        max_message_bytes = ?config.decode.max_message_bytes,
        max_group_depth = config.decode.max_group_depth,
        "codec config loaded"
    );
    Ok(config)
}

/// Errors from config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config{}: {detail}", source_suffix(.path))]
    Parse {
        path: Option<PathBuf>,
        detail: String,
    },
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

fn source_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" file {}", p.display()))
        .unwrap_or_default()
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Parse { detail, .. } => Self::Parse {
                path: Some(path.to_path_buf()),
                detail,
            },
            other => other,
        }
    }
}
