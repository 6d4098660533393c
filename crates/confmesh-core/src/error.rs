//! Error types for confmesh-core

use std::path::PathBuf;

/// Result type for confmesh-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration sections
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A matched source exists but cannot be parsed or has the wrong shape
    #[error("Bad configuration in {source_id}: {reason}")]
    BadConfiguration { source_id: String, reason: String },

    /// Discovery found no sources at all for a section
    #[error("No configuration found for section '{section}' matching {patterns:?} under {root}")]
    MissingConfiguration {
        section: String,
        patterns: Vec<String>,
        root: PathBuf,
    },

    /// Section has neither a pattern registration nor an adhoc value
    #[error("Unknown configuration section: {section}")]
    UnknownSection { section: String },

    /// Caller supplied an unusable resolver setup (empty patterns, bad keys)
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from confmesh-fs
    #[error(transparent)]
    Fs(#[from] confmesh_fs::Error),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error means the section name itself is not known.
    pub fn is_unknown_section(&self) -> bool {
        matches!(self, Self::UnknownSection { .. })
    }
}
