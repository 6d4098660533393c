//! Resolver construction from command-line options

use confmesh_core::{ConfigResolver, GlobDiscovery, RuntimeOverrides, SectionPatternRegistry};
use serde_json::Value;

use crate::cli::ResolverArgs;
use crate::error::{CliError, Result};

/// Split `KEY=VALUE`, parsing the value as a YAML scalar.
///
/// Values that do not parse to a scalar (`a: b`, `[a, b]`, malformed YAML)
/// are kept as plain strings.
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::user(format!("Invalid --param '{raw}': expected KEY=VALUE")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::user(format!("Invalid --param '{raw}': empty key")));
    }

    let value = value.trim();
    let parsed = match serde_yaml::from_str::<Value>(value) {
        Ok(scalar @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) => scalar,
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), parsed))
}

/// Group `SECTION=GLOB` entries by section, keeping first-seen section order
/// and the given pattern order.
pub fn parse_patterns(raw: &[String]) -> Result<Vec<(String, Vec<String>)>> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for entry in raw {
        let (section, pattern) = entry.split_once('=').ok_or_else(|| {
            CliError::user(format!("Invalid --pattern '{entry}': expected SECTION=GLOB"))
        })?;
        let section = section.trim().to_string();
        let pattern = pattern.trim().to_string();

        match grouped.iter_mut().find(|(name, _)| *name == section) {
            Some((_, patterns)) => patterns.push(pattern),
            None => grouped.push((section, vec![pattern])),
        }
    }
    Ok(grouped)
}

/// Build the resolver described by `args`.
pub fn build_resolver(args: &ResolverArgs) -> Result<ConfigResolver> {
    let mut discovery = GlobDiscovery::new().with_base_env(args.base_env.clone());
    for env in &args.known_envs {
        discovery = discovery.with_environment(env.clone());
    }
    for section in &args.optional {
        discovery = discovery.with_optional_section(section.clone());
    }

    let registry = SectionPatternRegistry::from_patterns(parse_patterns(&args.patterns)?)?;

    let mut overrides = RuntimeOverrides::new();
    for raw in &args.params {
        let (key, value) = parse_param(raw)?;
        overrides.insert(&key, value)?;
    }

    let mut resolver = ConfigResolver::with_discovery(&args.source, discovery)?
        .with_registry(registry)
        .with_runtime_overrides(overrides);
    if let Some(env) = &args.env {
        resolver = resolver.with_env(env.clone());
    }

    tracing::debug!(
        source = %resolver.source_root(),
        env = ?resolver.env(),
        "Resolver configured"
    );
    Ok(resolver)
}
