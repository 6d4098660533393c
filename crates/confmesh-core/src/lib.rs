//! Configuration resolution core for confmesh
//!
//! This crate turns a configuration source tree into merged, in-memory
//! section values:
//!
//! - **Section registry**: logical section name to ordered glob patterns,
//!   with fallbacks for the mandatory sections
//! - **Discovery**: pluggable collaborator that finds, parses and merges the
//!   sources of one section, including the environment overlay
//! - **Resolver**: dictionary-style surface with runtime overrides and adhoc
//!   values that shadow file-backed sections
//!
//! # Architecture
//!
//! ```text
//!            confmesh-cli
//!                 |
//!           confmesh-core
//!                 |
//!            confmesh-fs
//! ```

pub mod config;
pub mod error;

pub use config::{
    ConfigDiscovery, ConfigMapping, ConfigResolver, DEFAULT_BASE_ENV, DiscoveryRequest,
    GlobDiscovery, MANDATORY_SECTIONS, RuntimeOverrides, SectionPatternRegistry,
    StaticDiscovery, default_patterns, is_mandatory,
};
pub use error::{Error, Result};
