//! Format-aware loading of a single configuration source

use crate::{Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;

/// Serialization formats a configuration source may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Toml,
    Json,
    Yaml,
}

impl SourceFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect the format of `path`, if it has a supported extension.
    pub fn from_path(path: &NormalizedPath) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }

    /// Human-readable format name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Format-agnostic configuration reader.
///
/// Detects the format from the file extension and deserializes the content
/// transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = SourceFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
            extension: path.extension().unwrap_or("").to_string(),
        })?;
        let content = io::read_text(path)?;
        tracing::trace!(%path, format = format.name(), "Parsing configuration source");
        self.parse(&content, format, path)
    }

    /// Parse already-read content as `format`, attributing failures to `path`.
    pub fn parse<T: DeserializeOwned>(
        &self,
        content: &str,
        format: SourceFormat,
        path: &NormalizedPath,
    ) -> Result<T> {
        let parse_error = |message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        match format {
            SourceFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            SourceFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
            SourceFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }
}
