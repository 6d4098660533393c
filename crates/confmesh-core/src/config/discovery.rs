//! Discovery of section sources on disk
//!
//! [`ConfigDiscovery`] is the seam between the resolver and the filesystem:
//! given a section's patterns, the source root and the active environment it
//! returns the merged raw content. [`GlobDiscovery`] is the default
//! implementation.

use super::merge::{deep_merge, deep_merge_map};
use crate::{Error, Result};
use confmesh_fs::{ConfigStore, NormalizedPath, SourceFormat, walk};
use glob::{MatchOptions, Pattern};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

/// Everything a discovery collaborator needs to produce one section.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryRequest<'a> {
    pub section: &'a str,
    /// Ordered patterns; files matched by later patterns win on conflicts.
    pub patterns: &'a [String],
    pub source_root: &'a NormalizedPath,
    pub env: Option<&'a str>,
}

/// Produces the merged raw content of a section.
///
/// Implementations own file traversal, parsing, merging by precedence and the
/// environment overlay. They report unparsable sources as
/// [`Error::BadConfiguration`] and sections with no sources as
/// [`Error::MissingConfiguration`] when that is not acceptable.
pub trait ConfigDiscovery {
    fn discover(&self, request: &DiscoveryRequest<'_>) -> Result<Map<String, Value>>;
}

impl<D: ConfigDiscovery + ?Sized> ConfigDiscovery for &D {
    fn discover(&self, request: &DiscoveryRequest<'_>) -> Result<Map<String, Value>> {
        (**self).discover(request)
    }
}

impl<D: ConfigDiscovery + ?Sized> ConfigDiscovery for Box<D> {
    fn discover(&self, request: &DiscoveryRequest<'_>) -> Result<Map<String, Value>> {
        (**self).discover(request)
    }
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Default directory holding base sources.
pub const DEFAULT_BASE_ENV: &str = "base";

/// Glob-based discovery over a directory tree.
///
/// Layout:
///
/// ```text
/// <source_root>/<base_env>/   base sources (`base` unless configured)
/// <source_root>/<env>/        overlay for the active environment
/// ```
///
/// With an empty base environment the source root itself holds the base
/// sources. Environment directories then live inside the base tree, so the
/// active environment and every name passed to
/// [`GlobDiscovery::with_environment`] are left out of the base search.
///
/// Only files with a supported extension (`toml`, `json`, `yaml`, `yml`) are
/// considered; hidden files and directories are skipped.
#[derive(Debug, Clone)]
pub struct GlobDiscovery {
    base_env: Option<String>,
    environments: BTreeSet<String>,
    optional_sections: BTreeSet<String>,
    store: ConfigStore,
}

impl Default for GlobDiscovery {
    fn default() -> Self {
        Self {
            base_env: Some(DEFAULT_BASE_ENV.to_string()),
            environments: BTreeSet::new(),
            optional_sections: BTreeSet::new(),
            store: ConfigStore::new(),
        }
    }
}

impl GlobDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read base sources from `<source_root>/<base_env>`.
    ///
    /// An empty name reads them from the source root itself.
    pub fn with_base_env(mut self, base_env: impl Into<String>) -> Self {
        let base_env = base_env.into();
        self.base_env = (!base_env.is_empty()).then_some(base_env);
        self
    }

    /// Declare `<source_root>/<env>` as an environment directory.
    ///
    /// Only matters when the source root holds the base sources: declared
    /// environments are never read as base content.
    pub fn with_environment(mut self, env: impl Into<String>) -> Self {
        let env = env.into();
        if !env.is_empty() {
            self.environments.insert(env);
        }
        self
    }

    /// Let `section` resolve to an empty mapping when no sources match.
    pub fn with_optional_section(mut self, section: impl Into<String>) -> Self {
        self.optional_sections.insert(section.into());
        self
    }

    pub fn base_env(&self) -> Option<&str> {
        self.base_env.as_deref()
    }

    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.environments.iter().map(String::as_str)
    }

    pub fn is_optional(&self, section: &str) -> bool {
        self.optional_sections.contains(section)
    }

    /// Environment directories that sit inside the base directory.
    fn excluded_dirs(
        &self,
        source_root: &NormalizedPath,
        active_env: Option<&str>,
    ) -> Vec<NormalizedPath> {
        if self.base_env.is_some() {
            return Vec::new();
        }
        self.environments
            .iter()
            .map(String::as_str)
            .chain(active_env)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|env| source_root.join(env))
            .collect()
    }

    fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
        patterns
            .iter()
            .map(|p| {
                Pattern::new(p)
                    .map_err(|e| Error::invalid(format!("invalid glob pattern '{p}': {e}")))
            })
            .collect()
    }

    /// Files under `dir` matching `patterns`, in precedence order.
    ///
    /// Files are grouped by the first pattern that matches them; within one
    /// pattern they are sorted by path.
    fn matching_files(
        &self,
        dir: &NormalizedPath,
        patterns: &[Pattern],
        exclude: &[NormalizedPath],
    ) -> Result<Vec<NormalizedPath>> {
        let candidates: Vec<(NormalizedPath, NormalizedPath)> = walk::list_files(dir)?
            .into_iter()
            .filter(|file| SourceFormat::from_path(file).is_some())
            .filter(|file| !exclude.iter().any(|excluded| excluded.contains(file)))
            .filter_map(|file| {
                let relative = file.strip_prefix(dir)?;
                Some((file, relative))
            })
            .collect();

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for pattern in patterns {
            for (file, relative) in &candidates {
                if pattern.matches_with(relative.as_str(), MATCH_OPTIONS) && seen.insert(file) {
                    tracing::trace!(pattern = pattern.as_str(), %file, "Matched source");
                    matched.push(file.clone());
                }
            }
        }
        Ok(matched)
    }

    fn load_mapping(&self, file: &NormalizedPath) -> Result<Map<String, Value>> {
        let value: Value = self.store.load(file).map_err(|e| match e {
            confmesh_fs::Error::ConfigParse { path, message, .. } => Error::BadConfiguration {
                source_id: path.display().to_string(),
                reason: message,
            },
            other => Error::Fs(other),
        })?;

        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(Error::BadConfiguration {
                source_id: file.to_string(),
                reason: format!("top level must be a mapping, found {}", kind_of(&other)),
            }),
        }
    }

    fn merge_files(&self, files: &[NormalizedPath]) -> Result<Map<String, Value>> {
        let mut merged = Map::new();
        for file in files {
            tracing::debug!(%file, "Loading configuration source");
            deep_merge_map(&mut merged, self.load_mapping(file)?);
        }
        Ok(merged)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

impl ConfigDiscovery for GlobDiscovery {
    fn discover(&self, request: &DiscoveryRequest<'_>) -> Result<Map<String, Value>> {
        let patterns = Self::compile(request.patterns)?;
        let base_dir = match &self.base_env {
            Some(base_env) => request.source_root.join(base_env),
            None => request.source_root.clone(),
        };
        let active_env = request
            .env
            .filter(|env| !env.is_empty() && Some(*env) != self.base_env.as_deref());
        let excluded = self.excluded_dirs(request.source_root, active_env);

        let base_files = self.matching_files(&base_dir, &patterns, &excluded)?;
        let env_files = match active_env {
            Some(env) => self.matching_files(&request.source_root.join(env), &patterns, &[])?,
            None => Vec::new(),
        };

        if base_files.is_empty() && env_files.is_empty() {
            if self.is_optional(request.section) {
                tracing::debug!(section = request.section, "No sources for optional section");
                return Ok(Map::new());
            }
            return Err(Error::MissingConfiguration {
                section: request.section.to_string(),
                patterns: request.patterns.to_vec(),
                root: request.source_root.to_native(),
            });
        }

        let mut merged = self.merge_files(&base_files)?;
        if !env_files.is_empty() {
            tracing::debug!(
                section = request.section,
                env = ?request.env,
                files = env_files.len(),
                "Applying environment overlay"
            );
            deep_merge_map(&mut merged, self.merge_files(&env_files)?);
        }
        Ok(merged)
    }
}

/// In-memory discovery for callers that already hold section content.
///
/// Sections are keyed by name; the environment overlay for `env` is looked
/// up under `"<env>/<section>"`. Missing sections are reported the same way
/// [`GlobDiscovery`] reports them.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    sources: Map<String, Value>,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content for `key` (`"catalog"` or `"prod/catalog"`), deep-merged
    /// over anything already stored under the same key.
    pub fn with_source(mut self, key: &str, content: Value) -> Self {
        match self.sources.get_mut(key) {
            Some(existing) => deep_merge(existing, content),
            None => {
                self.sources.insert(key.to_string(), content);
            }
        }
        self
    }

    fn mapping(&self, key: &str) -> Result<Option<Map<String, Value>>> {
        match self.sources.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(other) => Err(Error::BadConfiguration {
                source_id: key.to_string(),
                reason: format!("top level must be a mapping, found {}", kind_of(other)),
            }),
        }
    }
}

impl ConfigDiscovery for StaticDiscovery {
    fn discover(&self, request: &DiscoveryRequest<'_>) -> Result<Map<String, Value>> {
        let base = self.mapping(request.section)?;
        let overlay = match request.env {
            Some(env) => self.mapping(&format!("{env}/{}", request.section))?,
            None => None,
        };

        if base.is_none() && overlay.is_none() {
            return Err(Error::MissingConfiguration {
                section: request.section.to_string(),
                patterns: request.patterns.to_vec(),
                root: request.source_root.to_native(),
            });
        }

        let mut merged = base.unwrap_or_default();
        if let Some(overlay) = overlay {
            deep_merge_map(&mut merged, overlay);
        }
        Ok(merged)
    }
}
