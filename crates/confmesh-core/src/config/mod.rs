//! Section-based configuration resolution
//!
//! A configuration source tree is split into logical sections (`catalog`,
//! `parameters`, `credentials`, `logging`, plus any user-registered ones).
//! Each section maps to an ordered list of glob patterns; the matching files
//! are merged, overlaid with the active environment and finally patched with
//! runtime overrides.
//!
//! # Precedence
//!
//! Later sources override earlier ones, with deep merging for mappings:
//!
//! 1. **Base sources** - files under `<source_root>/base/`, in pattern order
//! 2. **Environment overlay** - the same patterns under `<source_root>/<env>/`
//! 3. **Runtime overrides** - dotted keys such as `parameters.model.lr`
//!
//! # Example
//!
//! ```no_run
//! use confmesh_core::config::{ConfigMapping, ConfigResolver};
//!
//! let resolver = ConfigResolver::new("conf")?.with_env("prod");
//! let catalog = resolver.get("catalog")?;
//! println!("{catalog}");
//! # Ok::<(), confmesh_core::Error>(())
//! ```

mod discovery;
mod merge;
mod overrides;
mod registry;
mod resolver;

pub use discovery::{
    ConfigDiscovery, DEFAULT_BASE_ENV, DiscoveryRequest, GlobDiscovery, StaticDiscovery,
};
pub use merge::{deep_merge, deep_merge_map, insert_path};
pub use overrides::RuntimeOverrides;
pub use registry::{MANDATORY_SECTIONS, SectionPatternRegistry, default_patterns, is_mandatory};
pub use resolver::{ConfigMapping, ConfigResolver};
