//! List tracked sections and their patterns

use colored::Colorize;
use confmesh_core::{ConfigMapping, is_mandatory};
use serde_json::{Map, Value};

use crate::cli::ResolverArgs;
use crate::context::build_resolver;
use crate::error::Result;

/// Run the list command
pub fn run_list(args: &ResolverArgs, json: bool) -> Result<()> {
    let resolver = build_resolver(args)?;
    let registry = resolver.registry();

    if json {
        let mut out = Map::new();
        for section in resolver.sections() {
            let patterns = registry.resolve_patterns(&section)?;
            out.insert(section, Value::from(patterns));
        }
        println!("{}", serde_json::to_string_pretty(&Value::Object(out))?);
        return Ok(());
    }

    println!("{}", "Sections".bold());
    println!();
    for section in resolver.sections() {
        let patterns = registry.resolve_patterns(&section)?;
        let origin = if !registry.is_registered(&section) && is_mandatory(&section) {
            "default"
        } else {
            "registered"
        };
        println!(
            "  {:<14} {} ({})",
            section.green(),
            patterns.join(", "),
            origin.dimmed()
        );
    }
    println!();
    println!(
        "{} {} sections tracked under {}.",
        "Total:".dimmed(),
        resolver.len(),
        resolver.source_root().as_str().cyan()
    );

    Ok(())
}

/// Run the patterns command
pub fn run_patterns(args: &ResolverArgs, section: &str) -> Result<()> {
    let resolver = build_resolver(args)?;
    for pattern in resolver.registry().resolve_patterns(section)? {
        println!("{pattern}");
    }
    Ok(())
}
