//! Filesystem layer for confmesh
//!
//! Provides normalized paths, format-aware parsing of single configuration
//! sources and deterministic file listing for discovery.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use config::{ConfigStore, SourceFormat};
pub use error::{Error, Result};
pub use path::NormalizedPath;
