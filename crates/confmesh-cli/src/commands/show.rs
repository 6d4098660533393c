//! Print a resolved section

use confmesh_core::ConfigMapping;
use serde_json::Value;

use crate::cli::{OutputFormat, ResolverArgs};
use crate::context::build_resolver;
use crate::error::{CliError, Result};

/// Render a section value in the requested format.
pub fn render(section: &str, value: &Value, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Toml => {
            if !value.is_object() {
                return Err(CliError::user(format!(
                    "Section '{section}' is not a mapping and cannot be rendered as TOML"
                )));
            }
            toml::to_string_pretty(value)?
        }
    };
    Ok(rendered.trim_end().to_string())
}

/// Run the show command
pub fn run_show(args: &ResolverArgs, section: &str, format: OutputFormat) -> Result<()> {
    let resolver = build_resolver(args)?;
    let value = resolver.get(section)?;
    println!("{}", render(section, &value, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_toml_tables() {
        let value = json!({ "cars": { "type": "csv" } });
        let rendered = render("catalog", &value, OutputFormat::Toml).unwrap();
        assert!(rendered.contains("[cars]"), "got {rendered}");
        assert!(rendered.contains("type = \"csv\""), "got {rendered}");
    }

    #[test]
    fn toml_rejects_scalars() {
        let err = render("run_id", &json!("abc"), OutputFormat::Toml).unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
    }

    #[test]
    fn renders_yaml() {
        let rendered = render("logging", &json!({ "version": 1 }), OutputFormat::Yaml).unwrap();
        assert_eq!(rendered, "version: 1");
    }
}
