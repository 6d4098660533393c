//! Section resolution over a configuration source tree
//!
//! The `ConfigResolver` answers dictionary-style lookups by section name.
//! Each read of a pattern-backed section runs discovery again; values stored
//! with [`ConfigMapping::set`] shadow discovery until they are deleted.

use super::discovery::{ConfigDiscovery, DiscoveryRequest, GlobDiscovery};
use super::overrides::RuntimeOverrides;
use super::registry::SectionPatternRegistry;
use crate::{Error, Result};
use confmesh_fs::NormalizedPath;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Dictionary-style access to configuration sections.
pub trait ConfigMapping {
    /// Resolve `section` to its current value.
    fn get(&self, section: &str) -> Result<Value>;

    /// Store `value` under `section`, shadowing pattern resolution.
    ///
    /// Returns the adhoc value that was replaced, if any.
    fn set(&mut self, section: &str, value: Value) -> Option<Value>;

    /// Drop the adhoc value stored under `section`.
    ///
    /// Returns the removed value, or `None` when the section is only
    /// pattern-backed. Fails for names that are not tracked at all.
    fn delete(&mut self, section: &str) -> Result<Option<Value>>;

    /// Whether `section` is tracked (mandatory, registered or adhoc).
    fn contains(&self, section: &str) -> bool;

    /// Tracked section names in sorted order.
    fn sections(&self) -> Vec<String>;

    fn len(&self) -> usize {
        self.sections().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves configuration sections from a source root
///
/// Precedence, lowest to highest:
/// 1. Base sources (`<source_root>/base/` by default), in pattern order
/// 2. Environment overlay (`<source_root>/<env>/`)
/// 3. Runtime overrides for the section
///
/// Adhoc values bypass all three.
#[derive(Debug)]
pub struct ConfigResolver<D = GlobDiscovery> {
    source_root: NormalizedPath,
    env: Option<String>,
    runtime_overrides: RuntimeOverrides,
    registry: SectionPatternRegistry,
    adhoc: BTreeMap<String, Value>,
    discovery: D,
}

impl ConfigResolver<GlobDiscovery> {
    /// Create a resolver over `source_root` with default discovery.
    ///
    /// No files are read until a section is requested.
    pub fn new(source_root: impl AsRef<Path>) -> Result<Self> {
        Self::with_discovery(source_root, GlobDiscovery::default())
    }
}

impl<D: ConfigDiscovery> ConfigResolver<D> {
    /// Create a resolver that delegates discovery to `discovery`.
    pub fn with_discovery(source_root: impl AsRef<Path>, discovery: D) -> Result<Self> {
        let source_root = NormalizedPath::new(source_root);
        if source_root.is_empty() {
            return Err(Error::invalid("source root must not be empty"));
        }

        Ok(Self {
            source_root,
            env: None,
            runtime_overrides: RuntimeOverrides::default(),
            registry: SectionPatternRegistry::default(),
            adhoc: BTreeMap::new(),
            discovery,
        })
    }

    /// Select the environment overlay. An empty name means no environment.
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        let env = env.into();
        self.env = (!env.is_empty()).then_some(env);
        self
    }

    pub fn with_runtime_overrides(mut self, overrides: RuntimeOverrides) -> Self {
        self.runtime_overrides = overrides;
        self
    }

    /// Replace the pattern registry. Mandatory sections keep their fallback
    /// patterns even if `registry` leaves them out.
    pub fn with_registry(mut self, registry: SectionPatternRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn source_root(&self) -> &NormalizedPath {
        &self.source_root
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn runtime_overrides(&self) -> &RuntimeOverrides {
        &self.runtime_overrides
    }

    pub fn registry(&self) -> &SectionPatternRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SectionPatternRegistry {
        &mut self.registry
    }

    pub fn discovery(&self) -> &D {
        &self.discovery
    }

    /// Whether `section` currently holds an adhoc value.
    pub fn is_adhoc(&self, section: &str) -> bool {
        self.adhoc.contains_key(section)
    }

    /// Resolve a section from its patterns, ignoring any adhoc value.
    pub fn resolve_section(&self, section: &str) -> Result<Value> {
        let patterns = self.registry.resolve_patterns(section)?;
        tracing::debug!(
            %section,
            ?patterns,
            root = %self.source_root,
            env = ?self.env,
            "Resolving section"
        );

        let request = DiscoveryRequest {
            section,
            patterns: &patterns,
            source_root: &self.source_root,
            env: self.env.as_deref(),
        };
        let mut resolved = self.discovery.discover(&request)?;
        self.runtime_overrides.apply(section, &mut resolved);
        Ok(Value::Object(resolved))
    }

    /// Resolve every tracked section.
    ///
    /// Stops at the first section that fails to resolve.
    pub fn resolve_all(&self) -> Result<BTreeMap<String, Value>> {
        self.sections()
            .into_iter()
            .map(|section| {
                let value = self.get(&section)?;
                Ok((section, value))
            })
            .collect()
    }

    /// Remove `section`'s adhoc value and any adhoc entry its value names.
    ///
    /// A string value that is itself the key of another adhoc entry is a
    /// reference; the chain is followed until it ends.
    fn discard_adhoc(&mut self, section: &str) -> Option<Value> {
        let previous = self.adhoc.remove(section)?;

        let mut next = previous.as_str().map(str::to_owned);
        while let Some(key) = next.take() {
            if let Some(nested) = self.adhoc.remove(&key) {
                tracing::debug!(%section, nested = %key, "Discarded nested adhoc entry");
                next = nested.as_str().map(str::to_owned);
            }
        }
        Some(previous)
    }
}

impl<D: ConfigDiscovery> ConfigMapping for ConfigResolver<D> {
    fn get(&self, section: &str) -> Result<Value> {
        if let Some(value) = self.adhoc.get(section) {
            tracing::debug!(%section, "Returning adhoc section value");
            return Ok(value.clone());
        }
        self.resolve_section(section)
    }

    fn set(&mut self, section: &str, value: Value) -> Option<Value> {
        let previous = self.discard_adhoc(section);
        tracing::debug!(%section, replaced = previous.is_some(), "Storing adhoc section value");
        self.adhoc.insert(section.to_string(), value);
        previous
    }

    fn delete(&mut self, section: &str) -> Result<Option<Value>> {
        if self.is_adhoc(section) {
            return Ok(self.discard_adhoc(section));
        }
        if self.registry.knows(section) {
            tracing::debug!(%section, "Section is pattern-backed, nothing to delete");
            return Ok(None);
        }
        Err(Error::UnknownSection {
            section: section.to_string(),
        })
    }

    fn contains(&self, section: &str) -> bool {
        self.is_adhoc(section) || self.registry.knows(section)
    }

    fn sections(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self.registry.sections();
        names.extend(self.adhoc.keys().cloned());
        names.into_iter().collect()
    }
}
