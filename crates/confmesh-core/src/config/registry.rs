//! Section pattern registry
//!
//! Maps logical section names to the ordered glob patterns used to discover
//! their source files. The four mandatory sections always have a fallback
//! pattern set, so an empty registry still answers for them.

use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Sections every resolver answers for, registered or not.
pub const MANDATORY_SECTIONS: [&str; 4] = ["catalog", "parameters", "credentials", "logging"];

/// Whether `section` is one of [`MANDATORY_SECTIONS`].
pub fn is_mandatory(section: &str) -> bool {
    MANDATORY_SECTIONS.contains(&section)
}

/// The fallback pattern triple for a section: top-level files, files inside a
/// same-named directory, and same-named files at any depth.
pub fn default_patterns(section: &str) -> Vec<String> {
    vec![
        format!("{section}*"),
        format!("{section}*/**"),
        format!("**/{section}*"),
    ]
}

/// Registry of section name to ordered pattern set.
///
/// Later patterns win on key conflicts when their files are merged, so the
/// order given at registration is kept exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPatternRegistry {
    patterns: BTreeMap<String, Vec<String>>,
}

impl SectionPatternRegistry {
    /// Create a registry holding only the built-in mandatory fallbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(section, patterns)` pairs.
    ///
    /// Fails on the first pair whose pattern list is empty.
    pub fn from_patterns<I, S, P, T>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut registry = Self::new();
        for (section, patterns) in entries {
            registry.register(section, patterns)?;
        }
        Ok(registry)
    }

    /// Add or replace the pattern set for `section`.
    pub fn register<S, P, T>(&mut self, section: S, patterns: P) -> Result<()>
    where
        S: Into<String>,
        P: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let section = section.into();
        if section.is_empty() {
            return Err(Error::invalid("section name must not be empty"));
        }

        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            return Err(Error::invalid(format!(
                "section '{section}' must be registered with at least one pattern"
            )));
        }
        if let Some(blank) = patterns.iter().position(|p| p.trim().is_empty()) {
            return Err(Error::invalid(format!(
                "pattern #{blank} for section '{section}' is empty"
            )));
        }

        tracing::debug!(%section, ?patterns, "Registering section patterns");
        self.patterns.insert(section, patterns);
        Ok(())
    }

    /// Remove the registration for `section`, returning its patterns.
    ///
    /// A mandatory section falls back to its default patterns afterwards.
    pub fn unregister(&mut self, section: &str) -> Option<Vec<String>> {
        self.patterns.remove(section)
    }

    /// The pattern set used to discover `section`.
    pub fn resolve_patterns(&self, section: &str) -> Result<Vec<String>> {
        if let Some(patterns) = self.patterns.get(section) {
            return Ok(patterns.clone());
        }
        if is_mandatory(section) {
            return Ok(default_patterns(section));
        }
        Err(Error::UnknownSection {
            section: section.to_string(),
        })
    }

    /// Whether `section` has an explicit registration.
    pub fn is_registered(&self, section: &str) -> bool {
        self.patterns.contains_key(section)
    }

    /// Whether `section` can be resolved from patterns.
    pub fn knows(&self, section: &str) -> bool {
        is_mandatory(section) || self.is_registered(section)
    }

    /// Every resolvable section name: mandatory ones plus registrations.
    pub fn sections(&self) -> BTreeSet<String> {
        MANDATORY_SECTIONS
            .iter()
            .map(|s| s.to_string())
            .chain(self.patterns.keys().cloned())
            .collect()
    }
}
