//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand, ValueEnum};
use confmesh_core::DEFAULT_BASE_ENV;
use std::path::PathBuf;

/// confmesh - Resolve layered configuration sections
#[derive(Parser, Debug)]
#[command(name = "confmesh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub resolver: ResolverArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Options that shape how sections are resolved
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolverArgs {
    /// Configuration source root
    #[arg(short, long, global = true, env = "CONFMESH_SOURCE", default_value = "conf")]
    pub source: PathBuf,

    /// Environment whose overlay is applied (`<source>/<env>/`)
    #[arg(short, long, global = true, env = "CONFMESH_ENV")]
    pub env: Option<String>,

    /// Directory holding base sources (`<source>/<base-env>/`); empty for the root
    #[arg(long, global = true, env = "CONFMESH_BASE_ENV", default_value = DEFAULT_BASE_ENV)]
    pub base_env: String,

    /// Environment directory kept out of a root-level base search (repeatable)
    #[arg(long = "known-env", value_name = "ENV", global = true)]
    pub known_envs: Vec<String>,

    /// Runtime override, e.g. `parameters.model.lr=0.1` (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", global = true)]
    pub params: Vec<String>,

    /// Register a section pattern, e.g. `spark=spark*` (repeatable, ordered)
    #[arg(long = "pattern", value_name = "SECTION=GLOB", global = true)]
    pub patterns: Vec<String>,

    /// Section that resolves to an empty mapping when nothing matches
    #[arg(long = "optional", value_name = "SECTION", global = true)]
    pub optional: Vec<String>,
}

impl Default for ResolverArgs {
    fn default() -> Self {
        Self {
            source: PathBuf::from("conf"),
            env: None,
            base_env: DEFAULT_BASE_ENV.to_string(),
            known_envs: Vec::new(),
            params: Vec::new(),
            patterns: Vec::new(),
            optional: Vec::new(),
        }
    }
}

/// Output format for resolved sections
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the fully resolved value of a section
    ///
    /// Examples:
    ///   confmesh show catalog
    ///   confmesh -e prod show parameters --format yaml
    ///   confmesh show parameters --param parameters.epochs=20
    Show {
        /// Section name (catalog, parameters, credentials, logging, ...)
        section: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// List tracked sections and their patterns
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the pattern set used to discover a section
    Patterns {
        /// Section name
        section: String,
    },
}
