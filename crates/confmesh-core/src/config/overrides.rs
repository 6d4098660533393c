//! Runtime overrides applied on top of file-based resolution
//!
//! Keys are dotted paths whose first segment names the section
//! (`parameters.model.lr`). Values may themselves be nested mappings, so
//! `{"parameters.model": {"lr": 0.1}}` and
//! `{"parameters": {"model": {"lr": 0.1}}}` describe the same override.

use super::merge::{deep_merge_map, insert_path};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Section-scoped runtime overrides, highest precedence of all layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeOverrides {
    sections: BTreeMap<String, Map<String, Value>>,
}

fn split_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::invalid(format!(
            "runtime override key '{key}' has an empty segment"
        )));
    }
    Ok(segments)
}

impl RuntimeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build overrides from a mapping of dotted keys to values.
    pub fn from_map(params: Map<String, Value>) -> Result<Self> {
        let mut overrides = Self::new();
        for (key, value) in params {
            overrides.insert(&key, value)?;
        }
        Ok(overrides)
    }

    /// Add one override. Later inserts win over earlier ones on the same key.
    pub fn insert(&mut self, key: &str, value: Value) -> Result<()> {
        let segments = split_key(key)?;
        let (section, path) = segments
            .split_first()
            .ok_or_else(|| Error::invalid("runtime override key must not be empty"))?;

        if path.is_empty() {
            let Value::Object(map) = value else {
                return Err(Error::invalid(format!(
                    "runtime override for whole section '{section}' must be a mapping"
                )));
            };
            deep_merge_map(self.sections.entry(section.to_string()).or_default(), map);
        } else {
            insert_path(
                self.sections.entry(section.to_string()).or_default(),
                path,
                value,
            );
        }
        Ok(())
    }

    /// The override tree for `section`, if any.
    pub fn section(&self, section: &str) -> Option<&Map<String, Value>> {
        self.sections.get(section)
    }

    /// Names of sections that carry overrides.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Deep-merge the overrides for `section` over `resolved`.
    ///
    /// Returns whether anything was applied.
    pub fn apply(&self, section: &str, resolved: &mut Map<String, Value>) -> bool {
        match self.sections.get(section) {
            Some(overrides) => {
                tracing::debug!(%section, keys = overrides.len(), "Applying runtime overrides");
                deep_merge_map(resolved, overrides.clone());
                true
            }
            None => false,
        }
    }
}
